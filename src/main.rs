//! stretchtext - inspect and exercise StretchText markup

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use stretchtext::dom::{ArenaDom, ArenaNodeId, load_document};
use stretchtext::{
    Config, Display, HostDocument, InputEvent, StretchText, SummaryKind, ToggleState, describe,
    find_detail_for,
};

#[derive(Parser)]
#[command(name = "stretchtext")]
#[command(version, about = "Inspect and exercise StretchText markup", long_about = None)]
#[command(after_help = "EXAMPLES:
    stretchtext check chapter1.xhtml               List summaries and their details
    stretchtext toggle chapter1.xhtml --summary 0  Open the first summary")]
struct Cli {
    /// JSON configuration (markers, class names, titles)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Report every summary and how its detail resolves
    Check {
        /// Content document (HTML or XHTML)
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },
    /// Trigger a summary and print the resulting state
    Toggle {
        /// Content document (HTML or XHTML)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Index of the summary, as listed by `check`
        #[arg(short, long, default_value_t = 0)]
        summary: usize,

        /// Number of mousedown events to dispatch
        #[arg(short, long, default_value_t = 1)]
        times: usize,
    },
}

#[derive(Serialize)]
struct SummaryReport {
    index: usize,
    tag: String,
    kind: SummaryKind,
    marker: &'static str,
    text: String,
    detail: Option<String>,
    error: Option<String>,
}

#[derive(Serialize)]
struct ToggleReport {
    summary: usize,
    events: usize,
    state: ToggleState,
    title: Option<String>,
    summary_class: Option<String>,
    detail: Option<DetailReport>,
}

#[derive(Serialize)]
struct DetailReport {
    element: String,
    display: Option<Display>,
    state: ToggleState,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = load_config(cli.config.as_deref()).and_then(|config| match &cli.command {
        Command::Check { input } => check(input, config, cli.json),
        Command::Toggle {
            input,
            summary,
            times,
        } => toggle(input, config, *summary, *times, cli.json).map(|()| true),
    });

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config, String> {
    match path {
        Some(path) => Config::load(path).map_err(|e| format!("{}: {e}", path.display())),
        None => Ok(Config::default()),
    }
}

fn open(input: &Path) -> Result<ArenaDom, String> {
    load_document(input).map_err(|e| format!("{}: {e}", input.display()))
}

/// Returns whether every summary resolved.
fn check(input: &Path, config: Config, json: bool) -> Result<bool, String> {
    let dom = open(input)?;
    let st = StretchText::with_config(dom, stretchtext::Immediate, config);
    let dom = st.document();

    let reports: Vec<SummaryReport> = st
        .get_summaries()
        .iter()
        .enumerate()
        .map(|(index, &summary)| summary_report(dom, st.config(), index, summary))
        .collect();
    let all_resolved = reports.iter().all(|r| r.error.is_none());

    if json {
        let out = serde_json::to_string_pretty(&reports).map_err(|e| e.to_string())?;
        println!("{out}");
        return Ok(all_resolved);
    }

    println!("File: {}", input.display());
    println!("Summaries: {}", reports.len());
    for r in &reports {
        let outcome = match (&r.detail, &r.error) {
            (Some(detail), _) => format!("-> {detail}"),
            (None, Some(error)) => format!("!! {error}"),
            (None, None) => String::new(),
        };
        println!(
            "  [{}] <{}> {:?} via {}: \"{}\" {}",
            r.index, r.tag, r.kind, r.marker, r.text, outcome
        );
    }
    Ok(all_resolved)
}

fn summary_report(
    dom: &ArenaDom,
    config: &Config,
    index: usize,
    summary: ArenaNodeId,
) -> SummaryReport {
    let marker = if dom.get_attr(summary, &config.summary_attribute)
        == Some(config.summary_attribute_value.as_str())
    {
        if dom.has_class(summary, &config.summary_class) {
            "attribute+class"
        } else {
            "attribute"
        }
    } else {
        "class"
    };

    let (detail, error) = match find_detail_for(dom, &summary) {
        Ok(detail) => (Some(describe(dom, &detail)), None),
        Err(e) => (None, Some(e.to_string())),
    };

    SummaryReport {
        index,
        tag: HostDocument::local_name(dom, &summary),
        kind: SummaryKind::of(dom, &summary),
        marker,
        text: truncate(&dom.inner_text(summary), 60),
        detail,
        error,
    }
}

fn toggle(
    input: &Path,
    config: Config,
    index: usize,
    times: usize,
    json: bool,
) -> Result<(), String> {
    let dom = open(input)?;
    let mut st = StretchText::with_config(dom, stretchtext::FrameQueue::new(), config);
    let summaries = st.setup();
    let summary = *summaries.get(index).ok_or_else(|| {
        format!(
            "summary index {index} out of range ({} summaries)",
            summaries.len()
        )
    })?;

    for _ in 0..times {
        let mut event = InputEvent::mouse_down(summary);
        st.handle_event(&mut event);
        st.run_frame();
    }

    let dom = st.document();
    let detail = find_detail_for(dom, &summary).ok().map(|detail| DetailReport {
        element: describe(dom, &detail),
        display: HostDocument::display(dom, &detail),
        state: st.state(&detail),
    });
    let report = ToggleReport {
        summary: index,
        events: times,
        state: st.state(&summary),
        title: dom.get_attr(summary, "title").map(str::to_string),
        summary_class: dom.get_attr(summary, "class").map(str::to_string),
        detail,
    };

    if json {
        let out = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
        println!("{out}");
        return Ok(());
    }

    println!(
        "Summary [{}] after {} event(s): {:?}",
        report.summary, report.events, report.state
    );
    if let Some(title) = &report.title {
        println!("  title: {title}");
    }
    if let Some(class) = &report.summary_class {
        println!("  class: {class}");
    }
    match &report.detail {
        Some(detail) => {
            let display = detail.display.map_or("(unset)", Display::as_css);
            println!(
                "  detail: {} display={display} {:?}",
                detail.element, detail.state
            );
        }
        None => println!("  detail: (not found)"),
    }
    Ok(())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

//! Benchmarks for summary discovery and toggling.
//!
//! Run with: cargo bench

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use stretchtext::dom::{ArenaDom, parse_html};
use stretchtext::{Config, InputEvent, ListenerMode, StretchText, get_summaries};

/// A long chapter with `n` summaries, alternating anchors and inline spans.
fn sample_chapter(n: usize) -> String {
    let mut html = String::from("<html><body>");
    for i in 0..n {
        if i % 2 == 0 {
            html.push_str(&format!(
                r##"<p>Paragraph {i} with <a class="stretchsummary" href="#d{i}">a note</a>.</p><div id="d{i}" style="display: none">Detail {i}</div>"##
            ));
        } else {
            html.push_str(&format!(
                r#"<p>Paragraph {i} <span epub-type="stretchsummary">expands</span><span style="display: none">here</span>.</p>"#
            ));
        }
    }
    html.push_str("</body></html>");
    html
}

fn sample_dom() -> ArenaDom {
    parse_html(&sample_chapter(2_000))
}

// ============================================================================
// Parsing and Discovery
// ============================================================================

fn bench_parse(c: &mut Criterion) {
    let html = sample_chapter(2_000);
    c.bench_function("parse_chapter", |b| {
        b.iter(|| parse_html(black_box(&html)));
    });
}

fn bench_get_summaries(c: &mut Criterion) {
    let dom = sample_dom();
    let config = Config::default();
    c.bench_function("get_summaries", |b| {
        b.iter(|| get_summaries(black_box(&dom), &config));
    });
}

fn bench_setup(c: &mut Criterion) {
    let mut group = c.benchmark_group("setup");
    for (name, mode) in [
        ("per_element", ListenerMode::PerElement),
        ("delegated", ListenerMode::Delegated),
    ] {
        let dom = sample_dom();
        group.bench_function(name, |b| {
            b.iter(|| {
                let config = Config::default().with_listeners(mode);
                let mut st = StretchText::with_config(dom.clone(), stretchtext::Immediate, config);
                st.setup().len()
            });
        });
    }
    group.finish();
}

// ============================================================================
// Toggling
// ============================================================================

fn bench_toggle_every_summary(c: &mut Criterion) {
    let mut group = c.benchmark_group("toggle_all");
    for (name, mode) in [
        ("per_element", ListenerMode::PerElement),
        ("delegated", ListenerMode::Delegated),
    ] {
        let config = Config::default().with_listeners(mode);
        let mut st = StretchText::with_config(sample_dom(), stretchtext::FrameQueue::new(), config);
        let summaries = st.get_summaries();
        st.setup();

        group.bench_function(name, |b| {
            b.iter(|| {
                for &summary in &summaries {
                    st.handle_event(&mut InputEvent::mouse_down(summary));
                }
                st.run_frame()
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_parse,
    bench_get_summaries,
    bench_setup,
    bench_toggle_every_summary
);
criterion_main!(benches);

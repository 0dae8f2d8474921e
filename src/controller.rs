//! The StretchText controller.
//!
//! A *summary* toggles the visibility of its *detail*. Anchors are
//! block-level summaries whose `href` fragment names the detail anywhere in
//! the document; any other element is an inline summary whose detail is its
//! next element sibling.
//!
//! ```
//! use stretchtext::{InputEvent, StretchText};
//! use stretchtext::dom::parse_html;
//!
//! let dom = parse_html(
//!     r##"<a class="stretchsummary" href="#more">Tea</a><div id="more" style="display: none">...</div>"##,
//! );
//! let mut st = StretchText::queued(dom);
//! let summaries = st.setup();
//!
//! let mut event = InputEvent::mouse_down(summaries[0]);
//! st.handle_event(&mut event);
//! assert!(event.default_prevented());
//!
//! st.run_frame();
//! let detail = st.document().get_by_id("more").unwrap();
//! assert!(st.document().has_class(detail, "stretchtext-open"));
//! ```

use crate::config::{Config, ListenerMode};
use crate::error::{Error, Result};
use crate::event::{EventKind, InputEvent, Listeners};
use crate::host::{Display, HostDocument};
use crate::scheduler::{FrameQueue, FrameScheduler, Immediate, PendingToggle, ToggleState};

/// How a summary locates its detail, decided once from its tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SummaryKind {
    /// `<a href="#id">`: detail looked up by fragment id, shown as `block`.
    Block,
    /// Anything else: detail is the next element sibling, shown as `inline`.
    Inline,
}

impl SummaryKind {
    /// Classify a tag name. Only anchors are block-level.
    pub fn from_tag(tag: &str) -> Self {
        if tag.eq_ignore_ascii_case("a") {
            SummaryKind::Block
        } else {
            SummaryKind::Inline
        }
    }

    /// Classify an element.
    pub fn of<D: HostDocument>(doc: &D, summary: &D::Element) -> Self {
        Self::from_tag(&doc.local_name(summary))
    }

    /// Display mode a detail of this kind gets while open.
    pub fn open_display(self) -> Display {
        match self {
            SummaryKind::Block => Display::Block,
            SummaryKind::Inline => Display::Inline,
        }
    }
}

/// Whether `summary` is a block-level summary (an anchor).
pub fn is_block_level_detail<D: HostDocument>(doc: &D, summary: &D::Element) -> bool {
    SummaryKind::of(doc, summary) == SummaryKind::Block
}

/// Set the summary tooltip unless the element already has one.
///
/// An author-supplied title always wins.
pub fn set_title<D: HostDocument>(doc: &mut D, summary: &D::Element, title: &str) {
    if doc.has_attribute(summary, "title") {
        return;
    }
    doc.set_attribute(summary, "title", title);
}

/// Update a tooltip the controller owns.
///
/// Titles equal to one of the configured open/closed titles were written by
/// the controller and are replaced; anything else is the author's and is left
/// alone, exactly as [`set_title`] does.
pub fn refresh_title<D: HostDocument>(
    doc: &mut D,
    summary: &D::Element,
    title: &str,
    config: &Config,
) {
    match doc.attribute(summary, "title") {
        None => doc.set_attribute(summary, "title", title),
        Some(current)
            if current == config.title_when_closed || current == config.title_when_open =>
        {
            if current != title {
                doc.set_attribute(summary, "title", title);
            }
        }
        Some(_) => {}
    }
}

/// Resolve the detail element controlled by `summary`.
///
/// Failures are returned, not logged; see [`StretchText::find_detail_for`].
pub fn find_detail_for<D: HostDocument>(doc: &D, summary: &D::Element) -> Result<D::Element> {
    match SummaryKind::of(doc, summary) {
        SummaryKind::Block => {
            let href = doc.attribute(summary, "href").unwrap_or_default();
            let id = href.strip_prefix('#').unwrap_or(&href);
            doc.element_by_id(id)
                .ok_or_else(|| Error::DetailNotFound { id: id.to_string() })
        }
        SummaryKind::Inline => {
            doc.next_element_sibling(summary)
                .ok_or_else(|| Error::NoSiblingDetail {
                    summary: describe(doc, summary),
                })
        }
    }
}

/// Every summary in the document: attribute-marked first, then class-marked.
///
/// An element carrying both markers is returned twice.
pub fn get_summaries<D: HostDocument>(doc: &D, config: &Config) -> Vec<D::Element> {
    let mut results =
        doc.elements_with_attribute(&config.summary_attribute, &config.summary_attribute_value);
    results.extend(doc.elements_with_class(&config.summary_class));
    results
}

/// Whether an element carries either summary marker.
pub fn is_summary<D: HostDocument>(doc: &D, element: &D::Element, config: &Config) -> bool {
    doc.has_class(element, &config.summary_class)
        || doc
            .attribute(element, &config.summary_attribute)
            .is_some_and(|v| v == config.summary_attribute_value)
}

/// Short human-readable description of an element for diagnostics, e.g.
/// `<span id="s" class="stretchsummary">`.
pub fn describe<D: HostDocument>(doc: &D, element: &D::Element) -> String {
    let mut out = format!("<{}", doc.local_name(element));
    for attr in ["id", "class", "href"] {
        if let Some(value) = doc.attribute(element, attr) {
            out.push_str(&format!(" {attr}=\"{value}\""));
        }
    }
    out.push('>');
    out
}

/// Result of a handled trigger: phase 1 is done, phase 2 is scheduled.
#[derive(Debug, Clone, PartialEq)]
pub struct Toggled<E> {
    pub summary: E,
    pub detail: E,
    pub kind: SummaryKind,
    /// Display mode written to the detail in phase 1.
    pub display: Display,
    /// State the pair will be in once phase 2 runs.
    pub target_state: ToggleState,
}

/// Drives StretchText behavior over a host document.
pub struct StretchText<D: HostDocument, S = FrameQueue<<D as HostDocument>::Element>> {
    doc: D,
    scheduler: S,
    config: Config,
    listeners: Listeners<D::Element>,
    initialized: bool,
}

impl<D: HostDocument> StretchText<D, FrameQueue<D::Element>> {
    /// Controller whose phase 2 waits for [`run_frame`](Self::run_frame).
    pub fn queued(doc: D) -> Self {
        Self::new(doc, FrameQueue::new())
    }

    /// Run every phase-2 toggle queued so far. Returns how many ran.
    ///
    /// Toggles scheduled while the frame runs wait for the next one.
    pub fn run_frame(&mut self) -> usize {
        let frame = self.scheduler.take_frame();
        for toggle in &frame {
            toggle.complete(&mut self.doc, &self.config);
        }
        frame.len()
    }

    /// Number of toggles waiting for the next frame.
    pub fn pending_frames(&self) -> usize {
        self.scheduler.len()
    }
}

impl<D: HostDocument> StretchText<D, Immediate> {
    /// Controller that runs both phases back to back.
    pub fn immediate(doc: D) -> Self {
        Self::new(doc, Immediate)
    }
}

impl<D, S> StretchText<D, S>
where
    D: HostDocument,
    S: FrameScheduler<D>,
{
    pub fn new(doc: D, scheduler: S) -> Self {
        Self::with_config(doc, scheduler, Config::default())
    }

    pub fn with_config(doc: D, scheduler: S, config: Config) -> Self {
        Self {
            doc,
            scheduler,
            config,
            listeners: Listeners::new(),
            initialized: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn document(&self) -> &D {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.doc
    }

    pub fn listeners(&self) -> &Listeners<D::Element> {
        &self.listeners
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Discover summaries in the document.
    pub fn get_summaries(&self) -> Vec<D::Element> {
        get_summaries(&self.doc, &self.config)
    }

    /// Document-ready hook: set up every summary.
    ///
    /// Runs once. Later calls return an empty list, so a ready signal that
    /// fires twice does not double-register anything.
    pub fn setup(&mut self) -> Vec<D::Element> {
        if self.initialized {
            tracing::debug!(target: "stretchtext", "setup already ran, skipping");
            return Vec::new();
        }
        self.initialized = true;

        let summaries = self.get_summaries();
        for summary in &summaries {
            self.setup_summary(summary);
        }
        tracing::debug!(
            target: "stretchtext",
            count = summaries.len(),
            mode = ?self.config.listeners,
            "stretchtext summaries set up"
        );
        summaries
    }

    /// Give `summary` its default title and, per element, its listeners.
    pub fn setup_summary(&mut self, summary: &D::Element) {
        set_title(&mut self.doc, summary, &self.config.title_when_closed);
        if self.config.listeners == ListenerMode::PerElement {
            for kind in EventKind::LISTENED {
                self.listeners.add(summary.clone(), kind);
            }
        }
    }

    /// Resolve the detail for `summary`, logging a warning when there is none.
    pub fn find_detail_for(&self, summary: &D::Element) -> Option<D::Element> {
        match find_detail_for(&self.doc, summary) {
            Ok(detail) => Some(detail),
            Err(err) => {
                tracing::warn!(target: "stretchtext", "{err}");
                None
            }
        }
    }

    /// Current state of a summary.
    pub fn state(&self, summary: &D::Element) -> ToggleState {
        ToggleState::of(&self.doc, summary, &self.config)
    }

    /// Dispatch an input event.
    ///
    /// Returns the toggle that was started, if any. Clicks on summaries only
    /// have their default action (link navigation) suppressed.
    pub fn handle_event(&mut self, event: &mut InputEvent<D::Element>) -> Option<Toggled<D::Element>> {
        let summary = self.route(event)?;
        if event.kind.triggers_toggle() {
            return self.toggle_summary(&summary, event);
        }
        if event.kind == EventKind::Click {
            event.prevent_default();
        }
        None
    }

    /// Find the summary an event belongs to, walking from the target up.
    fn route(&self, event: &InputEvent<D::Element>) -> Option<D::Element> {
        let mut current = Some(event.target.clone());
        while let Some(element) = current {
            let listening = match self.config.listeners {
                ListenerMode::PerElement => self.listeners.has(&element, &event.kind),
                ListenerMode::Delegated => {
                    self.initialized && is_summary(&self.doc, &element, &self.config)
                }
            };
            if listening {
                return Some(element);
            }
            current = self.doc.parent_element(&element);
        }
        None
    }

    /// The toggle handler: phase 1 now, phase 2 on the scheduler.
    pub fn toggle_summary(
        &mut self,
        summary: &D::Element,
        event: &mut InputEvent<D::Element>,
    ) -> Option<Toggled<D::Element>> {
        // Keeps rapid clicks from selecting the summary text.
        event.prevent_default();
        self.toggle(summary)
    }

    /// Start a toggle without an input event.
    pub fn toggle(&mut self, summary: &D::Element) -> Option<Toggled<D::Element>> {
        let detail = self.find_detail_for(summary)?;
        let kind = SummaryKind::of(&self.doc, summary);

        // Transitions do not run from `display: none`, so the detail becomes
        // visible before the open class lands on the next frame.
        let (mode, target_state) = match self.state(summary) {
            ToggleState::Open => (Display::None, ToggleState::Closed),
            ToggleState::Closed => (kind.open_display(), ToggleState::Open),
        };
        self.doc.set_display(&detail, mode);

        tracing::debug!(
            target: "stretchtext",
            ?summary,
            ?detail,
            display = mode.as_css(),
            "stretchtext detail display set"
        );

        self.scheduler.schedule(
            &mut self.doc,
            &self.config,
            PendingToggle::new(summary.clone(), detail.clone()),
        );

        Some(Toggled {
            summary: summary.clone(),
            detail,
            kind,
            display: mode,
            target_state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{ArenaDom, ArenaNodeId, parse_html};
    use proptest::prelude::*;

    fn by_id(dom: &ArenaDom, id: &str) -> ArenaNodeId {
        dom.get_by_id(id).unwrap_or_else(|| panic!("no #{id}"))
    }

    #[test]
    fn test_summary_kind_from_tag() {
        assert_eq!(SummaryKind::from_tag("a"), SummaryKind::Block);
        assert_eq!(SummaryKind::from_tag("A"), SummaryKind::Block);
        assert_eq!(SummaryKind::from_tag("summary"), SummaryKind::Inline);
        assert_eq!(SummaryKind::from_tag("abbr"), SummaryKind::Inline);
        assert_eq!(SummaryKind::Block.open_display(), Display::Block);
        assert_eq!(SummaryKind::Inline.open_display(), Display::Inline);
    }

    #[test]
    fn test_is_block_level_detail() {
        let dom = parse_html(r#"<a id="a">x</a><summary id="s">y</summary>"#);
        assert!(is_block_level_detail(&dom, &by_id(&dom, "a")));
        assert!(!is_block_level_detail(&dom, &by_id(&dom, "s")));
    }

    #[test]
    fn test_set_title() {
        let mut dom = parse_html(r#"<span id="bare">x</span><span id="custom" title="Custom Title">y</span>"#);
        let bare = by_id(&dom, "bare");
        let custom = by_id(&dom, "custom");

        set_title(&mut dom, &bare, "Expand");
        set_title(&mut dom, &custom, "Expand");

        assert_eq!(dom.get_attr(bare, "title"), Some("Expand"));
        assert_eq!(dom.get_attr(custom, "title"), Some("Custom Title"));
    }

    #[test]
    fn test_empty_title_counts_as_author_title() {
        let mut dom = parse_html(r#"<span id="s" title="">x</span>"#);
        let s = by_id(&dom, "s");
        set_title(&mut dom, &s, "Expand");
        refresh_title(&mut dom, &s, "Collapse", &Config::default());
        assert_eq!(dom.get_attr(s, "title"), Some(""));
    }

    #[test]
    fn test_find_detail_by_fragment() {
        let dom = parse_html(r##"<p><a id="s" href="#detail">s</a></p><div id="detail">d</div>"##);
        let detail = find_detail_for(&dom, &by_id(&dom, "s")).unwrap();
        assert_eq!(detail, by_id(&dom, "detail"));
    }

    #[test]
    fn test_find_detail_href_without_hash() {
        let dom = parse_html(r#"<a id="s" href="detail">s</a><div id="detail">d</div>"#);
        assert_eq!(
            find_detail_for(&dom, &by_id(&dom, "s")).unwrap(),
            by_id(&dom, "detail")
        );
    }

    #[test]
    fn test_find_detail_by_sibling() {
        let dom = parse_html(r#"<div><summary id="s">s</summary> text <div id="d">d</div></div>"#);
        assert_eq!(
            find_detail_for(&dom, &by_id(&dom, "s")).unwrap(),
            by_id(&dom, "d")
        );
    }

    #[test]
    fn test_find_detail_missing_id() {
        let dom = parse_html(r##"<a id="s" href="#nowhere">s</a>"##);
        match find_detail_for(&dom, &by_id(&dom, "s")) {
            Err(Error::DetailNotFound { id }) => assert_eq!(id, "nowhere"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_find_detail_anchor_without_href() {
        let dom = parse_html(r#"<a id="s">s</a><div id="d">d</div>"#);
        let err = find_detail_for(&dom, &by_id(&dom, "s")).unwrap_err();
        assert!(matches!(err, Error::DetailNotFound { ref id } if id.is_empty()));
    }

    #[test]
    fn test_find_detail_no_sibling() {
        let dom = parse_html(r#"<p><span id="s" class="stretchsummary">s</span> trailing text</p>"#);
        let err = find_detail_for(&dom, &by_id(&dom, "s")).unwrap_err();
        assert!(err.is_unresolved_detail());
        assert_eq!(
            err.to_string(),
            r#"No StretchText details element found for: <span id="s" class="stretchsummary">"#
        );
    }

    #[test]
    fn test_get_summaries_order_and_duplicates() {
        let dom = parse_html(
            r##"<span id="c1" class="stretchsummary">1</span><span>d</span>
                <a id="both" href="#x" class="stretchsummary" epub-type="stretchsummary">2</a>
                <span id="a1" epub-type="stretchsummary">3</span><span>d</span>
                <div id="x">x</div>"##,
        );
        let summaries = get_summaries(&dom, &Config::default());
        let ids: Vec<_> = summaries
            .iter()
            .map(|&s| dom.element_id(s).unwrap())
            .collect();
        assert_eq!(ids, ["both", "a1", "c1", "both"]);
    }

    #[test]
    fn test_setup_runs_once() {
        let dom = parse_html(r#"<span class="stretchsummary">s</span><span>d</span>"#);
        let mut st = StretchText::queued(dom);

        let first = st.setup();
        assert_eq!(first.len(), 1);
        assert!(st.is_initialized());
        assert_eq!(st.listeners().kinds(&first[0]).map(<[_]>::len), Some(3));

        assert!(st.setup().is_empty());
        assert_eq!(st.listeners().len(), 1);
    }

    #[test]
    fn test_setup_keeps_author_title() {
        let dom = parse_html(
            r#"<span id="a" class="stretchsummary" title="Aside">s</span><span>d</span>
               <span id="b" class="stretchsummary">s</span><span>d</span>"#,
        );
        let mut st = StretchText::queued(dom);
        st.setup();
        let dom = st.document();
        assert_eq!(dom.get_attr(by_id(dom, "a"), "title"), Some("Aside"));
        assert_eq!(dom.get_attr(by_id(dom, "b"), "title"), Some("Expand"));
    }

    #[test]
    fn test_toggle_phases_inline() {
        let dom = parse_html(r#"<p><span id="s" class="stretchsummary">s</span><span id="d" style="display: none">d</span></p>"#);
        let mut st = StretchText::queued(dom);
        st.setup();
        let s = by_id(st.document(), "s");
        let d = by_id(st.document(), "d");

        let toggled = st.toggle(&s).unwrap();
        assert_eq!(toggled.kind, SummaryKind::Inline);
        assert_eq!(toggled.display, Display::Inline);
        assert_eq!(toggled.target_state, ToggleState::Open);

        // Phase 1 only.
        assert_eq!(st.document().display(&d), Some(Display::Inline));
        assert!(!st.document().has_class(d, "stretchtext-open"));
        assert_eq!(st.pending_frames(), 1);

        assert_eq!(st.run_frame(), 1);
        assert!(st.document().has_class(s, "stretchtext-open"));
        assert!(st.document().has_class(d, "stretchtext-open"));
        assert_eq!(st.document().get_attr(s, "title"), Some("Collapse"));
        assert_eq!(st.run_frame(), 0);
    }

    #[test]
    fn test_toggle_without_detail_changes_nothing() {
        let dom = parse_html(r##"<a id="s" class="stretchsummary" href="#gone">s</a>"##);
        let mut st = StretchText::queued(dom);
        st.setup();
        let s = by_id(st.document(), "s");

        let mut event = InputEvent::mouse_down(s);
        assert!(st.handle_event(&mut event).is_none());
        assert!(event.default_prevented());
        assert_eq!(st.pending_frames(), 0);
        assert_eq!(st.state(&s), ToggleState::Closed);
        assert_eq!(st.document().get_attr(s, "title"), Some("Expand"));
    }

    #[test]
    fn test_click_only_prevents_default() {
        let dom = parse_html(r##"<a id="s" class="stretchsummary" href="#d">s</a><div id="d">d</div>"##);
        let mut st = StretchText::queued(dom);
        st.setup();
        let s = by_id(st.document(), "s");

        let mut click = InputEvent::click(s);
        assert!(st.handle_event(&mut click).is_none());
        assert!(click.default_prevented());
        assert_eq!(st.pending_frames(), 0);
    }

    #[test]
    fn test_events_before_setup_are_ignored() {
        let dom = parse_html(r##"<a id="s" class="stretchsummary" href="#d">s</a><div id="d">d</div>"##);
        let mut st = StretchText::queued(dom);
        let s = by_id(st.document(), "s");

        let mut event = InputEvent::mouse_down(s);
        assert!(st.handle_event(&mut event).is_none());
        assert!(!event.default_prevented());
    }

    #[test]
    fn test_event_on_summary_descendant_bubbles_to_summary() {
        let dom = parse_html(
            r#"<p><span id="s" class="stretchsummary"><em id="inner">s</em></span><span id="d">d</span></p>"#,
        );
        let mut st = StretchText::queued(dom);
        st.setup();
        let inner = by_id(st.document(), "inner");
        let d = by_id(st.document(), "d");

        let toggled = st.handle_event(&mut InputEvent::touch_start(inner)).unwrap();
        assert_eq!(toggled.detail, d);
    }

    #[test]
    fn test_other_events_ignored() {
        let dom = parse_html(r#"<span id="s" class="stretchsummary">s</span><span>d</span>"#);
        let mut st = StretchText::queued(dom);
        st.setup();
        let s = by_id(st.document(), "s");

        let mut event = InputEvent::new(EventKind::from_type("mouseup"), s);
        assert!(st.handle_event(&mut event).is_none());
        assert!(!event.default_prevented());
    }

    #[test]
    fn test_delegated_matches_at_dispatch_time() {
        let dom = parse_html(r#"<p><span id="s">s</span><span id="d">d</span></p>"#);
        let config = Config::default().with_listeners(ListenerMode::Delegated);
        let mut st = StretchText::with_config(dom, Immediate, config);
        assert!(st.setup().is_empty());
        assert!(st.listeners().is_empty());

        let s = by_id(st.document(), "s");
        // Marked after setup: delegation still picks it up.
        st.document_mut().set_attr(s, "class", "stretchsummary");

        let toggled = st.handle_event(&mut InputEvent::mouse_down(s)).unwrap();
        assert_eq!(toggled.target_state, ToggleState::Open);
        assert_eq!(st.state(&s), ToggleState::Open);
    }

    #[test]
    fn test_delegated_only_toggle_events_toggle() {
        let dom = parse_html(r#"<span id="s" class="stretchsummary">s</span><span id="d">d</span>"#);
        let config = Config::default().with_listeners(ListenerMode::Delegated);
        let mut st = StretchText::with_config(dom, FrameQueue::new(), config);
        st.setup();
        let s = by_id(st.document(), "s");

        for event_type in ["mouseup", "keydown", "click"] {
            let mut event = InputEvent::new(EventKind::from_type(event_type), s);
            assert!(st.handle_event(&mut event).is_none());
            assert_eq!(event.default_prevented(), event_type == "click");
        }
        assert_eq!(st.pending_frames(), 0);

        assert!(st.handle_event(&mut InputEvent::touch_start(s)).is_some());
        assert_eq!(st.pending_frames(), 1);
    }

    #[test]
    fn test_describe_lists_identifying_attributes() {
        let dom = parse_html(
            r##"<a id="s" class="stretchsummary" href="#d" style="color: red">s</a><em>e</em>"##,
        );
        assert_eq!(
            describe(&dom, &by_id(&dom, "s")),
            r##"<a id="s" class="stretchsummary" href="#d">"##
        );
        let em = dom.find_by_tag("em").unwrap();
        assert_eq!(describe(&dom, &em), "<em>");
    }

    #[test]
    fn test_retrigger_before_frame_is_not_debounced() {
        let dom = parse_html(r#"<span id="s" class="stretchsummary">s</span><span id="d">d</span>"#);
        let mut st = StretchText::queued(dom);
        st.setup();
        let s = by_id(st.document(), "s");
        let d = by_id(st.document(), "d");

        st.toggle(&s);
        st.toggle(&s);
        assert_eq!(st.pending_frames(), 2);
        // Still closed in between, so both phase 1 writes opened the detail.
        assert_eq!(st.document().display(&d), Some(Display::Inline));

        st.run_frame();
        // Two class flips cancel out.
        assert_eq!(st.state(&s), ToggleState::Closed);
        assert_eq!(st.state(&d), ToggleState::Closed);
    }

    proptest! {
        #[test]
        fn prop_only_anchors_are_block_level(tag in "[a-zA-Z][a-zA-Z0-9-]{0,10}") {
            let expected = if tag.eq_ignore_ascii_case("a") {
                SummaryKind::Block
            } else {
                SummaryKind::Inline
            };
            prop_assert_eq!(SummaryKind::from_tag(&tag), expected);
        }

        #[test]
        fn prop_parsed_tag_kind_matches(tag in "(a|span|summary|abbr|div|em|dfn)") {
            let dom = parse_html(&format!(r#"<{tag} id="s">x</{tag}>"#));
            let s = by_id(&dom, "s");
            prop_assert_eq!(is_block_level_detail(&dom, &s), tag == "a");
        }
    }
}

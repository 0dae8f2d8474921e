//! Input events and listener bookkeeping.
//!
//! Toggles fire on `mousedown`/`touchstart` rather than `click`: a rapid
//! double-click would otherwise select the summary text. Link navigation can
//! only be canceled from `click`, so summaries also get a click listener that
//! does nothing but prevent the default action.

use std::fmt;

/// DOM input event types the controller cares about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    MouseDown,
    TouchStart,
    Click,
    Other(String),
}

impl EventKind {
    /// Event kinds registered on every summary.
    pub const LISTENED: [EventKind; 3] = [
        EventKind::MouseDown,
        EventKind::TouchStart,
        EventKind::Click,
    ];

    /// Map a DOM event `type` string.
    pub fn from_type(event_type: &str) -> Self {
        match event_type {
            "mousedown" => EventKind::MouseDown,
            "touchstart" => EventKind::TouchStart,
            "click" => EventKind::Click,
            other => EventKind::Other(other.to_string()),
        }
    }

    /// DOM event `type` string.
    pub fn as_type(&self) -> &str {
        match self {
            EventKind::MouseDown => "mousedown",
            EventKind::TouchStart => "touchstart",
            EventKind::Click => "click",
            EventKind::Other(name) => name,
        }
    }

    /// Whether this event runs the toggle handler.
    pub fn triggers_toggle(&self) -> bool {
        matches!(self, EventKind::MouseDown | EventKind::TouchStart)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_type())
    }
}

/// An input event delivered to the controller.
#[derive(Debug, Clone)]
pub struct InputEvent<E> {
    pub kind: EventKind,
    /// Element the event was dispatched at (may be a descendant of a summary).
    pub target: E,
    default_prevented: bool,
}

impl<E> InputEvent<E> {
    pub fn new(kind: EventKind, target: E) -> Self {
        Self {
            kind,
            target,
            default_prevented: false,
        }
    }

    pub fn mouse_down(target: E) -> Self {
        Self::new(EventKind::MouseDown, target)
    }

    pub fn touch_start(target: E) -> Self {
        Self::new(EventKind::TouchStart, target)
    }

    pub fn click(target: E) -> Self {
        Self::new(EventKind::Click, target)
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Per-element listener registrations, in registration order.
///
/// Lookups are a linear scan, so registering `n` summaries costs O(n²) and
/// routing an event costs O(n) per ancestor visited. Browser element handles
/// are not `Hash`, which rules out a map keyed by element. Documents with
/// many summaries should use [`ListenerMode::Delegated`](crate::ListenerMode::Delegated),
/// which keeps this registry empty.
#[derive(Debug, Clone)]
pub struct Listeners<E> {
    entries: Vec<(E, Vec<EventKind>)>,
}

impl<E: PartialEq> Listeners<E> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register `kind` on `element`. Registering the same pair twice is a
    /// no-op, matching `addEventListener` with an identical handler.
    pub fn add(&mut self, element: E, kind: EventKind) -> bool {
        match self.entries.iter_mut().find(|(el, _)| *el == element) {
            Some((_, kinds)) if kinds.contains(&kind) => false,
            Some((_, kinds)) => {
                kinds.push(kind);
                true
            }
            None => {
                self.entries.push((element, vec![kind]));
                true
            }
        }
    }

    pub fn has(&self, element: &E, kind: &EventKind) -> bool {
        self.kinds(element).is_some_and(|kinds| kinds.contains(kind))
    }

    pub fn kinds(&self, element: &E) -> Option<&[EventKind]> {
        self.entries
            .iter()
            .find(|(el, _)| el == element)
            .map(|(_, kinds)| kinds.as_slice())
    }

    /// Number of elements with at least one listener.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Each element once, with its kinds, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&E, &[EventKind])> {
        self.entries
            .iter()
            .map(|(el, kinds)| (el, kinds.as_slice()))
    }
}

impl<E: PartialEq> Default for Listeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

//! Deferred second phase of a toggle.
//!
//! A detail must be laid out (phase 1: inline `display`) before the open
//! class is flipped (phase 2), otherwise CSS transitions never run. Phase 2
//! is handed to a [`FrameScheduler`] so hosts decide when "next frame" is:
//! the browser uses `requestAnimationFrame`, tests and the CLI drain a
//! [`FrameQueue`] by hand or use [`Immediate`].

use std::collections::VecDeque;

use crate::config::Config;
use crate::controller::refresh_title;
use crate::host::HostDocument;

/// Open/closed state of a summary/detail pair, carried by the open class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ToggleState {
    Closed,
    Open,
}

impl ToggleState {
    /// State of `element` as recorded by the open class.
    pub fn of<D: HostDocument>(doc: &D, element: &D::Element, config: &Config) -> Self {
        if doc.has_class(element, &config.open_class) {
            ToggleState::Open
        } else {
            ToggleState::Closed
        }
    }
}

/// Phase-2 work for one summary/detail pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingToggle<E> {
    pub summary: E,
    pub detail: E,
}

impl<E> PendingToggle<E> {
    pub fn new(summary: E, detail: E) -> Self {
        Self { summary, detail }
    }

    /// Flip the open class on both elements and refresh the summary title.
    ///
    /// Returns the summary's state afterwards.
    pub fn complete<D>(&self, doc: &mut D, config: &Config) -> ToggleState
    where
        D: HostDocument<Element = E>,
        E: std::fmt::Debug,
    {
        let summary_open = doc.toggle_class(&self.summary, &config.open_class);
        doc.toggle_class(&self.detail, &config.open_class);

        let (state, title) = if summary_open {
            (ToggleState::Open, &config.title_when_open)
        } else {
            (ToggleState::Closed, &config.title_when_closed)
        };
        refresh_title(doc, &self.summary, title, config);

        tracing::debug!(
            target: "stretchtext",
            summary = ?self.summary,
            detail = ?self.detail,
            ?state,
            "stretchtext class toggled"
        );
        state
    }
}

/// Decides when phase 2 of a toggle runs.
pub trait FrameScheduler<D: HostDocument> {
    fn schedule(&mut self, doc: &mut D, config: &Config, toggle: PendingToggle<D::Element>);
}

/// Runs phase 2 synchronously, right after phase 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct Immediate;

impl<D: HostDocument> FrameScheduler<D> for Immediate {
    fn schedule(&mut self, doc: &mut D, config: &Config, toggle: PendingToggle<D::Element>) {
        toggle.complete(doc, config);
    }
}

/// FIFO of pending phase-2 toggles, drained one frame at a time by the host.
#[derive(Debug, Clone)]
pub struct FrameQueue<E> {
    pending: VecDeque<PendingToggle<E>>,
}

impl<E> FrameQueue<E> {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Remove everything queued so far, oldest first.
    pub fn take_frame(&mut self) -> Vec<PendingToggle<E>> {
        self.pending.drain(..).collect()
    }
}

impl<E> Default for FrameQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: HostDocument> FrameScheduler<D> for FrameQueue<D::Element> {
    fn schedule(&mut self, _doc: &mut D, _config: &Config, toggle: PendingToggle<D::Element>) {
        self.pending.push_back(toggle);
    }
}

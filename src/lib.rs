//! # stretchtext
//!
//! Expandable "StretchText" for EPUB and HTML content documents: tapping a
//! short *summary* reveals its *detail*, with a class-driven CSS transition
//! and an `Expand`/`Collapse` tooltip.
//!
//! ## Markup
//!
//! Summaries carry the class `stretchsummary` or the attribute
//! `epub-type="stretchsummary"`.
//!
//! - An anchor summary names its detail by fragment: `<a href="#more">`.
//!   The detail can live anywhere in the document and opens as `block`.
//! - Any other summary controls its next element sibling, which opens as
//!   `inline`.
//!
//! While open, both elements carry `stretchtext-open`; the stylesheet decides
//! what that looks like.
//!
//! ## Quick Start
//!
//! ```
//! use stretchtext::{InputEvent, StretchText, ToggleState};
//! use stretchtext::dom::parse_html;
//!
//! let dom = parse_html(
//!     r#"<p>The <span class="stretchsummary">tea</span><span style="display: none">,
//!        a first flush Darjeeling,</span> was cold.</p>"#,
//! );
//!
//! let mut st = StretchText::immediate(dom);
//! let summaries = st.setup();
//!
//! st.handle_event(&mut InputEvent::mouse_down(summaries[0]));
//! assert_eq!(st.state(&summaries[0]), ToggleState::Open);
//! ```
//!
//! In the browser, enable the `wasm` feature and call `install()` from
//! JavaScript; the same controller then drives the live DOM.

pub mod config;
pub mod controller;
pub mod dom;
pub mod error;
pub mod event;
pub mod host;
pub mod scheduler;
pub(crate) mod util;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::{Config, ListenerMode};
pub use controller::{
    StretchText, SummaryKind, Toggled, describe, find_detail_for, get_summaries,
    is_block_level_detail, is_summary, refresh_title, set_title,
};
pub use error::{Error, Result};
pub use event::{EventKind, InputEvent, Listeners};
pub use host::{Display, HostDocument};
pub use scheduler::{FrameQueue, FrameScheduler, Immediate, PendingToggle, ToggleState};

//! The document interface the controller drives.
//!
//! [`HostDocument`] is the seam between the StretchText behavior and whatever
//! owns the tree: the in-memory [`ArenaDom`](crate::dom::ArenaDom) natively, or
//! the browser DOM under the `wasm` feature. The controller never creates or
//! removes elements; it only reads structure and flips a title, a class and
//! the inline display mode.

use std::fmt;

/// Inline `display` mode written to a detail element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Display {
    None,
    Block,
    Inline,
}

impl Display {
    /// CSS keyword for this mode.
    pub fn as_css(self) -> &'static str {
        match self {
            Display::None => "none",
            Display::Block => "block",
            Display::Inline => "inline",
        }
    }

    /// Parse a CSS `display` keyword we write. Anything else is `None`
    /// (the Rust `Option`, not the display mode).
    pub fn from_css(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" => Some(Display::None),
            "block" => Some(Display::Block),
            "inline" => Some(Display::Inline),
            _ => None,
        }
    }
}

impl fmt::Display for Display {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_css())
    }
}

/// Read and mutate access to a live document tree.
///
/// Query results are in document order. Element handles are cheap to clone
/// and compare by identity.
pub trait HostDocument {
    /// Handle to an element in this document.
    type Element: Clone + PartialEq + fmt::Debug;

    /// Elements whose attribute `name` equals `value` exactly.
    fn elements_with_attribute(&self, name: &str, value: &str) -> Vec<Self::Element>;

    /// Elements whose class list contains `class`.
    fn elements_with_class(&self, class: &str) -> Vec<Self::Element>;

    /// First connected element with the given id.
    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// Next sibling that is an element.
    fn next_element_sibling(&self, element: &Self::Element) -> Option<Self::Element>;

    /// Parent, if it is an element.
    fn parent_element(&self, element: &Self::Element) -> Option<Self::Element>;

    /// Lowercased local tag name.
    fn local_name(&self, element: &Self::Element) -> String;

    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    fn has_attribute(&self, element: &Self::Element, name: &str) -> bool {
        self.attribute(element, name).is_some()
    }

    fn set_attribute(&mut self, element: &Self::Element, name: &str, value: &str);

    fn has_class(&self, element: &Self::Element, class: &str) -> bool;

    /// Flip `class` and return whether it is now present.
    fn toggle_class(&mut self, element: &Self::Element, class: &str) -> bool;

    /// Current inline display mode, if one of ours is set.
    fn display(&self, element: &Self::Element) -> Option<Display>;

    fn set_display(&mut self, element: &Self::Element, display: Display);
}

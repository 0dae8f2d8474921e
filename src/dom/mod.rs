//! In-memory document model.
//!
//! Content documents are parsed with html5ever into an [`ArenaDom`], which
//! implements [`HostDocument`] so the controller can run outside a browser.
//!
//! # Example
//!
//! ```
//! use stretchtext::dom::parse_html;
//!
//! let dom = parse_html(r#"<p class="stretchsummary">More</p><p>Details</p>"#);
//! let p = dom.find_by_tag("p").unwrap();
//! assert!(dom.has_class(p, "stretchsummary"));
//! ```

mod arena;
mod element_ref;
mod tree_sink;

pub use arena::{ArenaDom, ArenaNode, ArenaNodeData, ArenaNodeId, Attribute};
pub use element_ref::{
    ElementRef, Selector, StretchSelectors, attribute_selector, attribute_selector_source,
    parse_selector,
};

use std::path::Path;

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

use crate::error::Result;
use crate::host::{Display, HostDocument};
use tree_sink::ArenaSink;

/// Parse an HTML or XHTML document into an arena.
pub fn parse_html(html: &str) -> ArenaDom {
    let sink = ArenaSink::new();
    let result = parse_document(sink, ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes());
    result.into_dom()
}

/// Parse raw document bytes.
///
/// UTF-8 is tried first; otherwise the encoding named in the XML declaration,
/// falling back to Windows-1252 (common in older ebooks).
pub fn parse_html_bytes(bytes: &[u8]) -> ArenaDom {
    let hint_encoding = crate::util::extract_xml_encoding(bytes);
    let html = crate::util::decode_text(bytes, hint_encoding);
    parse_html(&html)
}

/// Read and parse a content document from disk.
pub fn load_document(path: impl AsRef<Path>) -> Result<ArenaDom> {
    let bytes = std::fs::read(path.as_ref())?;
    Ok(parse_html_bytes(&bytes))
}

impl HostDocument for ArenaDom {
    type Element = ArenaNodeId;

    fn elements_with_attribute(&self, name: &str, value: &str) -> Vec<ArenaNodeId> {
        match attribute_selector(name, value) {
            Ok(selector) => self.select(&selector),
            // Names that cannot be serialized as a selector: compare directly.
            Err(_) => self
                .elements()
                .filter(|&id| self.get_attr(id, name) == Some(value))
                .collect(),
        }
    }

    fn elements_with_class(&self, class: &str) -> Vec<ArenaNodeId> {
        self.elements()
            .filter(|&id| self.has_class(id, class))
            .collect()
    }

    fn element_by_id(&self, id: &str) -> Option<ArenaNodeId> {
        self.get_by_id(id)
    }

    fn next_element_sibling(&self, element: &ArenaNodeId) -> Option<ArenaNodeId> {
        ArenaDom::next_element_sibling(self, *element)
    }

    fn parent_element(&self, element: &ArenaNodeId) -> Option<ArenaNodeId> {
        ArenaDom::parent_element(self, *element)
    }

    fn local_name(&self, element: &ArenaNodeId) -> String {
        self.element_name(*element)
            .map(|n| n.as_ref().to_ascii_lowercase())
            .unwrap_or_default()
    }

    fn attribute(&self, element: &ArenaNodeId, name: &str) -> Option<String> {
        self.get_attr(*element, name).map(str::to_string)
    }

    fn has_attribute(&self, element: &ArenaNodeId, name: &str) -> bool {
        self.has_attr(*element, name)
    }

    fn set_attribute(&mut self, element: &ArenaNodeId, name: &str, value: &str) {
        self.set_attr(*element, name, value);
    }

    fn has_class(&self, element: &ArenaNodeId, class: &str) -> bool {
        ArenaDom::has_class(self, *element, class)
    }

    fn toggle_class(&mut self, element: &ArenaNodeId, class: &str) -> bool {
        ArenaDom::toggle_class(self, *element, class)
    }

    fn display(&self, element: &ArenaNodeId) -> Option<Display> {
        self.style_property(*element, "display")
            .as_deref()
            .and_then(Display::from_css)
    }

    fn set_display(&mut self, element: &ArenaNodeId, display: Display) {
        self.set_style_property(*element, "display", display.as_css());
    }
}

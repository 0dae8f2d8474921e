//! selectors crate Element implementation for ArenaDom.
//!
//! Summary discovery is expressed as CSS selectors (`[epub-type="stretchsummary"]`,
//! `.stretchsummary`), so the arena answers the same queries a browser's
//! `querySelectorAll` would.

use std::fmt;

use html5ever::{LocalName, Namespace};
use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::context::{MatchingContext, SelectorCaches};
use selectors::matching::ElementSelectorFlags;
use selectors::parser::SelectorParseErrorKind;
use selectors::{OpaqueElement, SelectorImpl};

use super::arena::{ArenaDom, ArenaNodeData, ArenaNodeId};
use crate::error::{Error, Result};

/// A parsed selector over the arena DOM.
pub type Selector = selectors::parser::Selector<StretchSelectors>;

/// [`SelectorImpl`] for the arena. Only type, class, id, attribute and
/// combinator selectors are supported; summary discovery needs nothing more.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StretchSelectors;

/// Identifiers and attribute values as they appear in a selector.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct IdentStr(pub String);

/// Element local name, shared with the tree's interned atoms.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CssLocalName(pub LocalName);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CssNamespace(pub Namespace);

// The selectors crate wants its string types constructible from the parser's
// input and printable back as CSS.
macro_rules! css_string_type {
    ($ty:ident, $inner:expr) => {
        impl From<&str> for $ty {
            fn from(s: &str) -> Self {
                $ty($inner(s))
            }
        }

        impl From<String> for $ty {
            fn from(s: String) -> Self {
                $ty::from(s.as_str())
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl cssparser::ToCss for $ty {
            fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
                dest.write_str(self.as_ref())
            }
        }
    };
}

css_string_type!(IdentStr, str::to_string);
css_string_type!(CssLocalName, LocalName::from);
css_string_type!(CssNamespace, Namespace::from);

impl precomputed_hash::PrecomputedHash for IdentStr {
    fn precomputed_hash(&self) -> u32 {
        // FNV-1a; only feeds the bloom filter, which the arena does not use.
        self.0.bytes().fold(0x811c_9dc5_u32, |h, b| {
            (h ^ u32::from(b)).wrapping_mul(0x0100_0193)
        })
    }
}

impl precomputed_hash::PrecomputedHash for CssLocalName {
    fn precomputed_hash(&self) -> u32 {
        self.0.precomputed_hash()
    }
}

impl precomputed_hash::PrecomputedHash for CssNamespace {
    fn precomputed_hash(&self) -> u32 {
        self.0.precomputed_hash()
    }
}

impl<'i> selectors::parser::Parser<'i> for StretchSelectors {
    type Impl = StretchSelectors;
    type Error = SelectorParseErrorKind<'i>;
}

/// No pseudo-elements are recognized.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PseudoElement {}

impl cssparser::ToCss for PseudoElement {
    fn to_css<W: fmt::Write>(&self, _dest: &mut W) -> fmt::Result {
        match *self {}
    }
}

impl selectors::parser::PseudoElement for PseudoElement {
    type Impl = StretchSelectors;

    fn accepts_state_pseudo_classes(&self) -> bool {
        match *self {}
    }

    fn valid_after_slotted(&self) -> bool {
        match *self {}
    }
}

/// No non-tree-structural pseudo-classes are recognized: a static document
/// has no hover, focus or visited state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NonTSPseudoClass {}

impl selectors::parser::NonTSPseudoClass for NonTSPseudoClass {
    type Impl = StretchSelectors;

    fn is_active_or_hover(&self) -> bool {
        match *self {}
    }

    fn is_user_action_state(&self) -> bool {
        match *self {}
    }
}

impl cssparser::ToCss for NonTSPseudoClass {
    fn to_css<W: fmt::Write>(&self, _dest: &mut W) -> fmt::Result {
        match *self {}
    }
}

impl SelectorImpl for StretchSelectors {
    type ExtraMatchingData<'a> = ();
    type AttrValue = IdentStr;
    type Identifier = IdentStr;
    type LocalName = CssLocalName;
    type NamespaceUrl = CssNamespace;
    type NamespacePrefix = IdentStr;
    type BorrowedLocalName = CssLocalName;
    type BorrowedNamespaceUrl = CssNamespace;
    type NonTSPseudoClass = NonTSPseudoClass;
    type PseudoElement = PseudoElement;
}

/// An arena element as seen by selector matching.
#[derive(Clone, Copy)]
pub struct ElementRef<'a> {
    pub dom: &'a ArenaDom,
    pub id: ArenaNodeId,
}

impl<'a> ElementRef<'a> {
    pub fn new(dom: &'a ArenaDom, id: ArenaNodeId) -> Self {
        Self { dom, id }
    }

    fn at(&self, id: Option<ArenaNodeId>) -> Option<Self> {
        id.map(|id| Self::new(self.dom, id))
    }

    fn is_anchor_with_href(&self) -> bool {
        self.dom
            .element_name(self.id)
            .is_some_and(|n| n.as_ref().eq_ignore_ascii_case("a"))
            && self.dom.has_attr(self.id, "href")
    }
}

impl fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementRef")
            .field("id", &self.id)
            .field("name", &self.dom.element_name(self.id))
            .finish()
    }
}

impl selectors::Element for ElementRef<'_> {
    type Impl = StretchSelectors;

    fn opaque(&self) -> OpaqueElement {
        OpaqueElement::new(self)
    }

    fn parent_element(&self) -> Option<Self> {
        self.at(self.dom.parent_element(self.id))
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        self.at(self.dom.prev_element_sibling(self.id))
    }

    fn next_sibling_element(&self) -> Option<Self> {
        self.at(self.dom.next_element_sibling(self.id))
    }

    fn first_element_child(&self) -> Option<Self> {
        let first = self.dom.children(self.id).find(|&c| self.dom.is_element(c));
        self.at(first)
    }

    fn is_html_element_in_html_document(&self) -> bool {
        true
    }

    fn has_local_name(&self, name: &CssLocalName) -> bool {
        self.dom.element_name(self.id) == Some(&name.0)
    }

    fn has_namespace(&self, ns: &CssNamespace) -> bool {
        self.dom.element_namespace(self.id) == Some(&ns.0)
    }

    fn is_same_type(&self, other: &Self) -> bool {
        self.dom.element_name(self.id) == other.dom.element_name(other.id)
    }

    fn attr_matches(
        &self,
        ns: &NamespaceConstraint<&CssNamespace>,
        local_name: &CssLocalName,
        operation: &AttrSelectorOperation<&IdentStr>,
    ) -> bool {
        let Some(ArenaNodeData::Element { attrs, .. }) = self.dom.get(self.id).map(|n| &n.data)
        else {
            return false;
        };

        attrs
            .iter()
            .filter(|attr| attr.name.local == local_name.0)
            .filter(|attr| match ns {
                NamespaceConstraint::Any => true,
                NamespaceConstraint::Specific(ns) => attr.name.ns == ns.0,
            })
            .any(|attr| operation.eval_str(&attr.value))
    }

    fn match_non_ts_pseudo_class(
        &self,
        pc: &NonTSPseudoClass,
        _context: &mut MatchingContext<'_, Self::Impl>,
    ) -> bool {
        match *pc {}
    }

    fn match_pseudo_element(
        &self,
        pe: &PseudoElement,
        _context: &mut MatchingContext<'_, Self::Impl>,
    ) -> bool {
        match *pe {}
    }

    fn is_link(&self) -> bool {
        self.is_anchor_with_href()
    }

    fn is_html_slot_element(&self) -> bool {
        false
    }

    fn has_id(&self, id: &IdentStr, case_sensitivity: CaseSensitivity) -> bool {
        self.dom
            .element_id(self.id)
            .is_some_and(|own| case_sensitivity.eq(own.as_bytes(), id.0.as_bytes()))
    }

    fn has_class(&self, name: &IdentStr, case_sensitivity: CaseSensitivity) -> bool {
        self.dom
            .element_classes(self.id)
            .iter()
            .any(|c| case_sensitivity.eq(c.as_bytes(), name.0.as_bytes()))
    }

    fn imported_part(&self, _name: &IdentStr) -> Option<IdentStr> {
        None
    }

    fn is_part(&self, _name: &IdentStr) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        !self.dom.children(self.id).any(|child| {
            self.dom.is_element(child)
                || self
                    .dom
                    .text_content(child)
                    .is_some_and(|t| !t.trim().is_empty())
        })
    }

    fn is_root(&self) -> bool {
        self.dom
            .get(self.id)
            .is_some_and(|n| n.parent == self.dom.document())
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn add_element_unique_hashes(&self, _filter: &mut selectors::bloom::BloomFilter) -> bool {
        false
    }

    fn has_custom_state(&self, _name: &IdentStr) -> bool {
        false
    }
}

/// Parse a single complex selector.
pub fn parse_selector(source: &str) -> Result<Selector> {
    let mut parser_input = cssparser::ParserInput::new(source);
    let mut parser = cssparser::Parser::new(&mut parser_input);
    let selector = Selector::parse(&StretchSelectors, &mut parser)
        .map_err(|_| Error::InvalidSelector(source.to_string()))?;
    parser
        .expect_exhausted()
        .map_err(|_| Error::InvalidSelector(source.to_string()))?;
    Ok(selector)
}

/// Source text of an attribute-equals selector, e.g. `[epub-type="stretchsummary"]`.
///
/// The browser backend hands this straight to `querySelectorAll`.
pub fn attribute_selector_source(name: &str, value: &str) -> Result<String> {
    let mut source = String::from("[");
    cssparser::serialize_identifier(name, &mut source)
        .map_err(|_| Error::InvalidSelector(name.to_string()))?;
    source.push('=');
    cssparser::serialize_string(value, &mut source)
        .map_err(|_| Error::InvalidSelector(value.to_string()))?;
    source.push(']');
    Ok(source)
}

/// Parsed form of [`attribute_selector_source`].
pub fn attribute_selector(name: &str, value: &str) -> Result<Selector> {
    parse_selector(&attribute_selector_source(name, value)?)
}

/// Check whether an element matches a selector.
pub fn matches(dom: &ArenaDom, id: ArenaNodeId, selector: &Selector) -> bool {
    if !dom.is_element(id) {
        return false;
    }
    let elem = ElementRef::new(dom, id);
    let mut caches = SelectorCaches::default();
    let mut context = MatchingContext::new(
        selectors::matching::MatchingMode::Normal,
        None,
        &mut caches,
        selectors::context::QuirksMode::NoQuirks,
        selectors::matching::NeedsSelectorFlags::No,
        selectors::matching::MatchingForInvalidation::No,
    );
    selectors::matching::matches_selector(selector, 0, None, &elem, &mut context)
}

impl ArenaDom {
    /// All elements matching `selector`, in document order (`querySelectorAll`).
    pub fn select(&self, selector: &Selector) -> Vec<ArenaNodeId> {
        self.elements()
            .filter(|&id| matches(self, id, selector))
            .collect()
    }
}

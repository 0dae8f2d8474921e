//! Arena-based DOM for StretchText content documents.
//!
//! html5ever parses into this tree (see [`super::tree_sink`]). Unlike a
//! read-only parse tree, the arena supports the small set of in-place
//! mutations the controller performs: attributes, class tokens and the
//! inline `display` declaration.

use std::collections::HashMap;

use html5ever::{LocalName, Namespace, QualName, ns};

/// Unique identifier for a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArenaNodeId(pub u32);

impl ArenaNodeId {
    /// Sentinel value for no node.
    pub const NONE: ArenaNodeId = ArenaNodeId(u32::MAX);

    /// Check if this is a valid node ID.
    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    /// Check if this is the sentinel value.
    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }
}

/// Node type in the arena DOM.
#[derive(Debug, Clone)]
pub enum ArenaNodeData {
    /// Document root.
    Document,
    /// Element with name and attributes.
    Element {
        name: QualName,
        attrs: Vec<Attribute>,
        /// Cached `id` attribute, kept in sync by [`ArenaDom::set_attr`].
        id: Option<String>,
        /// Cached class tokens, kept in sync by [`ArenaDom::set_attr`].
        classes: Vec<String>,
    },
    /// Text content.
    Text(String),
    /// Comment (ignored but needed for TreeSink).
    Comment(String),
    /// Document type declaration.
    Doctype { name: String },
}

/// HTML attribute.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: QualName,
    pub value: String,
}

/// A node in the arena DOM.
#[derive(Debug, Clone)]
pub struct ArenaNode {
    pub data: ArenaNodeData,
    pub parent: ArenaNodeId,
    pub first_child: ArenaNodeId,
    pub last_child: ArenaNodeId,
    pub prev_sibling: ArenaNodeId,
    pub next_sibling: ArenaNodeId,
}

impl ArenaNode {
    fn new(data: ArenaNodeData) -> Self {
        Self {
            data,
            parent: ArenaNodeId::NONE,
            first_child: ArenaNodeId::NONE,
            last_child: ArenaNodeId::NONE,
            prev_sibling: ArenaNodeId::NONE,
            next_sibling: ArenaNodeId::NONE,
        }
    }
}

/// Arena-based DOM tree.
///
/// All nodes are stored in a contiguous vector. Parent/child/sibling links
/// use indices into this vector.
#[derive(Debug, Clone)]
pub struct ArenaDom {
    nodes: Vec<ArenaNode>,
    document: ArenaNodeId,
    /// Every node that has ever carried a given id, in creation order.
    /// Entries are re-validated on lookup, so stale ones are harmless.
    id_map: HashMap<String, Vec<ArenaNodeId>>,
}

impl ArenaDom {
    /// Create a new empty DOM with a document root.
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            document: ArenaNodeId::NONE,
            id_map: HashMap::new(),
        };
        dom.document = dom.alloc(ArenaNode::new(ArenaNodeData::Document));
        dom
    }

    fn alloc(&mut self, node: ArenaNode) -> ArenaNodeId {
        let id = ArenaNodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the document root ID.
    pub fn document(&self) -> ArenaNodeId {
        self.document
    }

    /// Get a node by ID.
    pub fn get(&self, id: ArenaNodeId) -> Option<&ArenaNode> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    /// Get a mutable node by ID.
    pub fn get_mut(&mut self, id: ArenaNodeId) -> Option<&mut ArenaNode> {
        if id.is_none() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    /// Create a new, detached element node.
    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> ArenaNodeId {
        let id = attrs
            .iter()
            .find(|a| a.name.local.as_ref() == "id")
            .map(|a| a.value.clone());
        let classes = attrs
            .iter()
            .find(|a| a.name.local.as_ref() == "class")
            .map(|a| class_tokens(&a.value))
            .unwrap_or_default();

        let node_id = self.alloc(ArenaNode::new(ArenaNodeData::Element {
            name,
            attrs,
            id: id.clone(),
            classes,
        }));

        if let Some(id_str) = id {
            self.id_map.entry(id_str).or_default().push(node_id);
        }

        node_id
    }

    /// Create an HTML element by tag name. Convenience for building trees by hand.
    pub fn create_html_element(&mut self, tag: &str, attrs: &[(&str, &str)]) -> ArenaNodeId {
        let attrs = attrs
            .iter()
            .map(|(name, value)| Attribute {
                name: html_name(name),
                value: (*value).to_string(),
            })
            .collect();
        self.create_element(
            QualName::new(None, ns!(html), LocalName::from(tag)),
            attrs,
        )
    }

    /// Create a new text node.
    pub fn create_text(&mut self, text: String) -> ArenaNodeId {
        self.alloc(ArenaNode::new(ArenaNodeData::Text(text)))
    }

    /// Create a new comment node.
    pub fn create_comment(&mut self, text: String) -> ArenaNodeId {
        self.alloc(ArenaNode::new(ArenaNodeData::Comment(text)))
    }

    /// Create a doctype node.
    pub fn create_doctype(&mut self, name: String) -> ArenaNodeId {
        self.alloc(ArenaNode::new(ArenaNodeData::Doctype { name }))
    }

    /// Append a child to a parent node.
    pub fn append(&mut self, parent: ArenaNodeId, child: ArenaNodeId) {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(ArenaNodeId::NONE);

        if let Some(child_node) = self.get_mut(child) {
            child_node.parent = parent;
            child_node.prev_sibling = last_child;
            child_node.next_sibling = ArenaNodeId::NONE;
        }

        if last_child.is_some()
            && let Some(last_node) = self.get_mut(last_child)
        {
            last_node.next_sibling = child;
        }

        if let Some(parent_node) = self.get_mut(parent) {
            if parent_node.first_child.is_none() {
                parent_node.first_child = child;
            }
            parent_node.last_child = child;
        }
    }

    /// Insert a node before a sibling.
    pub fn insert_before(&mut self, sibling: ArenaNodeId, new_node: ArenaNodeId) {
        let (parent, prev) = self
            .get(sibling)
            .map(|n| (n.parent, n.prev_sibling))
            .unwrap_or((ArenaNodeId::NONE, ArenaNodeId::NONE));

        if let Some(new) = self.get_mut(new_node) {
            new.parent = parent;
            new.prev_sibling = prev;
            new.next_sibling = sibling;
        }

        if let Some(sib) = self.get_mut(sibling) {
            sib.prev_sibling = new_node;
        }

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = new_node;
            }
        } else if let Some(par) = self.get_mut(parent) {
            par.first_child = new_node;
        }
    }

    /// Unlink a node from its parent. The node and its subtree stay in the arena.
    pub fn detach(&mut self, target: ArenaNodeId) {
        let (parent, prev, next) = match self.get(target) {
            Some(n) => (n.parent, n.prev_sibling, n.next_sibling),
            None => return,
        };

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = next;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.first_child = next;
        }

        if next.is_some() {
            if let Some(n) = self.get_mut(next) {
                n.prev_sibling = prev;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.last_child = prev;
        }

        if let Some(node) = self.get_mut(target) {
            node.parent = ArenaNodeId::NONE;
            node.prev_sibling = ArenaNodeId::NONE;
            node.next_sibling = ArenaNodeId::NONE;
        }
    }

    /// Append text to an existing text node, or create new if last child isn't text.
    pub fn append_text(&mut self, parent: ArenaNodeId, text: &str) {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(ArenaNodeId::NONE);

        if let Some(last) = self.get_mut(last_child)
            && let ArenaNodeData::Text(ref mut existing) = last.data
        {
            existing.push_str(text);
            return;
        }

        let text_node = self.create_text(text.to_string());
        self.append(parent, text_node);
    }

    /// Get the first connected element with the given `id`, in document order.
    pub fn get_by_id(&self, id: &str) -> Option<ArenaNodeId> {
        let candidates = self.id_map.get(id)?;
        let live: Vec<ArenaNodeId> = candidates
            .iter()
            .copied()
            .filter(|&c| self.element_id(c) == Some(id) && self.is_connected(c))
            .collect();

        match live.as_slice() {
            [] => None,
            [only] => Some(*only),
            // Duplicate ids: the first one in tree order wins.
            _ => self.descendants(self.document).find(|n| live.contains(n)),
        }
    }

    /// Whether a node is reachable from the document root.
    pub fn is_connected(&self, id: ArenaNodeId) -> bool {
        let mut current = id;
        while let Some(node) = self.get(current) {
            if current == self.document {
                return true;
            }
            current = node.parent;
        }
        false
    }

    /// Get the number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the DOM is empty (only has document root).
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Iterate over children of a node.
    pub fn children(&self, parent: ArenaNodeId) -> ChildrenIter<'_> {
        let first = self
            .get(parent)
            .map(|n| n.first_child)
            .unwrap_or(ArenaNodeId::NONE);
        ChildrenIter {
            dom: self,
            current: first,
        }
    }

    /// Iterate over all descendants of `root` in document (pre-)order.
    /// `root` itself is not yielded.
    pub fn descendants(&self, root: ArenaNodeId) -> Descendants<'_> {
        let first = self
            .get(root)
            .map(|n| n.first_child)
            .unwrap_or(ArenaNodeId::NONE);
        Descendants {
            dom: self,
            root,
            next: first,
        }
    }

    /// Iterate over all elements in the document, in document order.
    pub fn elements(&self) -> impl Iterator<Item = ArenaNodeId> + '_ {
        self.descendants(self.document)
            .filter(move |&id| self.is_element(id))
    }

    /// Find the first node matching a predicate, in document order.
    pub fn find<F>(&self, predicate: F) -> Option<ArenaNodeId>
    where
        F: Fn(&ArenaNode) -> bool,
    {
        self.descendants(self.document)
            .find(|&id| self.get(id).is_some_and(&predicate))
    }

    /// Find element by tag name (first match).
    pub fn find_by_tag(&self, tag: &str) -> Option<ArenaNodeId> {
        self.find(|node| match &node.data {
            ArenaNodeData::Element { name, .. } => name.local.as_ref() == tag,
            _ => false,
        })
    }

    /// All elements by tag name, in document order.
    pub fn find_all_by_tag(&self, tag: &str) -> Vec<ArenaNodeId> {
        self.elements()
            .filter(|&id| self.element_name(id).is_some_and(|n| n.as_ref() == tag))
            .collect()
    }
}

impl Default for ArenaDom {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over children of a node.
pub struct ChildrenIter<'a> {
    dom: &'a ArenaDom,
    current: ArenaNodeId,
}

impl Iterator for ChildrenIter<'_> {
    type Item = ArenaNodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self
            .dom
            .get(id)
            .map(|n| n.next_sibling)
            .unwrap_or(ArenaNodeId::NONE);
        Some(id)
    }
}

/// Pre-order iterator over a subtree, following sibling and parent links.
pub struct Descendants<'a> {
    dom: &'a ArenaDom,
    root: ArenaNodeId,
    next: ArenaNodeId,
}

impl Iterator for Descendants<'_> {
    type Item = ArenaNodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next;
        let node = self.dom.get(current)?;

        self.next = if node.first_child.is_some() {
            node.first_child
        } else {
            let mut cursor = current;
            loop {
                if cursor == self.root {
                    break ArenaNodeId::NONE;
                }
                let Some(n) = self.dom.get(cursor) else {
                    break ArenaNodeId::NONE;
                };
                if n.next_sibling.is_some() {
                    break n.next_sibling;
                }
                cursor = n.parent;
                if cursor == self.root || cursor.is_none() {
                    break ArenaNodeId::NONE;
                }
            }
        };

        Some(current)
    }
}

/// Element accessors and mutators.
impl ArenaDom {
    /// Get element's local name (tag).
    pub fn element_name(&self, id: ArenaNodeId) -> Option<&LocalName> {
        self.get(id).and_then(|n| match &n.data {
            ArenaNodeData::Element { name, .. } => Some(&name.local),
            _ => None,
        })
    }

    /// Get element's namespace.
    pub fn element_namespace(&self, id: ArenaNodeId) -> Option<&Namespace> {
        self.get(id).and_then(|n| match &n.data {
            ArenaNodeData::Element { name, .. } => Some(&name.ns),
            _ => None,
        })
    }

    /// Get an attribute value.
    pub fn get_attr(&self, id: ArenaNodeId, attr_name: &str) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            ArenaNodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|a| a.name.local.as_ref() == attr_name)
                .map(|a| a.value.as_str()),
            _ => None,
        })
    }

    /// Whether an element carries the attribute at all (even if empty).
    pub fn has_attr(&self, id: ArenaNodeId, attr_name: &str) -> bool {
        self.get_attr(id, attr_name).is_some()
    }

    /// Set (or add) an attribute. Keeps the id and class caches in sync.
    ///
    /// Returns `false` if the node is not an element.
    pub fn set_attr(&mut self, id: ArenaNodeId, attr_name: &str, value: &str) -> bool {
        let Some(node) = self.get_mut(id) else {
            return false;
        };
        let ArenaNodeData::Element {
            attrs,
            id: cached_id,
            classes,
            ..
        } = &mut node.data
        else {
            return false;
        };

        match attrs.iter_mut().find(|a| a.name.local.as_ref() == attr_name) {
            Some(attr) => attr.value = value.to_string(),
            None => attrs.push(Attribute {
                name: html_name(attr_name),
                value: value.to_string(),
            }),
        }

        match attr_name {
            "id" => {
                *cached_id = Some(value.to_string());
                let entry = self.id_map.entry(value.to_string()).or_default();
                if !entry.contains(&id) {
                    entry.push(id);
                }
            }
            "class" => *classes = class_tokens(value),
            _ => {}
        }
        true
    }

    /// Remove an attribute. Returns whether it was present.
    pub fn remove_attr(&mut self, id: ArenaNodeId, attr_name: &str) -> bool {
        let Some(node) = self.get_mut(id) else {
            return false;
        };
        let ArenaNodeData::Element {
            attrs,
            id: cached_id,
            classes,
            ..
        } = &mut node.data
        else {
            return false;
        };

        let before = attrs.len();
        attrs.retain(|a| a.name.local.as_ref() != attr_name);
        match attr_name {
            "id" => *cached_id = None,
            "class" => classes.clear(),
            _ => {}
        }
        attrs.len() != before
    }

    /// Get element's id attribute.
    pub fn element_id(&self, id: ArenaNodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            ArenaNodeData::Element { id, .. } => id.as_deref(),
            _ => None,
        })
    }

    /// Get element's classes.
    pub fn element_classes(&self, id: ArenaNodeId) -> &[String] {
        static EMPTY: &[String] = &[];
        self.get(id)
            .and_then(|n| match &n.data {
                ArenaNodeData::Element { classes, .. } => Some(classes.as_slice()),
                _ => None,
            })
            .unwrap_or(EMPTY)
    }

    /// Whether the element's class list contains `class`.
    pub fn has_class(&self, id: ArenaNodeId, class: &str) -> bool {
        self.element_classes(id).iter().any(|c| c == class)
    }

    /// Add `class` if absent, remove it if present. Returns whether it is now present.
    pub fn toggle_class(&mut self, id: ArenaNodeId, class: &str) -> bool {
        let mut classes = self.element_classes(id).to_vec();
        let present = if let Some(pos) = classes.iter().position(|c| c == class) {
            classes.remove(pos);
            false
        } else {
            classes.push(class.to_string());
            true
        };
        // Non-elements refuse the write and never carry the class.
        let written = self.set_attr(id, "class", &classes.join(" "));
        present && written
    }

    /// Read an inline style declaration from the `style` attribute.
    pub fn style_property(&self, id: ArenaNodeId, property: &str) -> Option<String> {
        let style = self.get_attr(id, "style")?;
        parse_style_declarations(style)
            .into_iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value)
    }

    /// Set an inline style declaration, preserving the others.
    /// An empty value removes the declaration.
    pub fn set_style_property(&mut self, id: ArenaNodeId, property: &str, value: &str) {
        let mut decls = parse_style_declarations(self.get_attr(id, "style").unwrap_or(""));
        match decls.iter().position(|(name, _)| name == property) {
            Some(pos) if value.is_empty() => {
                decls.remove(pos);
            }
            Some(pos) => decls[pos].1 = value.to_string(),
            None if !value.is_empty() => decls.push((property.to_string(), value.to_string())),
            None => {}
        }

        if decls.is_empty() {
            self.remove_attr(id, "style");
        } else {
            let serialized = decls
                .iter()
                .map(|(name, value)| format!("{name}: {value};"))
                .collect::<Vec<_>>()
                .join(" ");
            self.set_attr(id, "style", &serialized);
        }
    }

    /// Next sibling that is an element, skipping text and comments.
    pub fn next_element_sibling(&self, id: ArenaNodeId) -> Option<ArenaNodeId> {
        let mut current = self.get(id)?.next_sibling;
        while current.is_some() {
            if self.is_element(current) {
                return Some(current);
            }
            current = self.get(current)?.next_sibling;
        }
        None
    }

    /// Previous sibling that is an element.
    pub fn prev_element_sibling(&self, id: ArenaNodeId) -> Option<ArenaNodeId> {
        let mut current = self.get(id)?.prev_sibling;
        while current.is_some() {
            if self.is_element(current) {
                return Some(current);
            }
            current = self.get(current)?.prev_sibling;
        }
        None
    }

    /// Parent node if it is an element.
    pub fn parent_element(&self, id: ArenaNodeId) -> Option<ArenaNodeId> {
        let parent = self.get(id)?.parent;
        self.is_element(parent).then_some(parent)
    }

    /// Check if node is an element.
    pub fn is_element(&self, id: ArenaNodeId) -> bool {
        self.get(id)
            .is_some_and(|n| matches!(n.data, ArenaNodeData::Element { .. }))
    }

    /// Get text content of a text node.
    pub fn text_content(&self, id: ArenaNodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            ArenaNodeData::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Concatenated text of a subtree, whitespace-collapsed.
    pub fn inner_text(&self, id: ArenaNodeId) -> String {
        let raw: String = self
            .descendants(id)
            .filter_map(|n| self.text_content(n))
            .collect();
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

fn html_name(local: &str) -> QualName {
    QualName::new(None, ns!(), LocalName::from(local))
}

fn class_tokens(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}

/// Split a `style` attribute into `(property, value)` pairs.
/// Property names are lowercased; malformed fragments are dropped.
fn parse_style_declarations(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim().to_ascii_lowercase();
            let value = value.trim();
            (!name.is_empty() && !value.is_empty()).then(|| (name, value.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_elements() {
        let mut dom = ArenaDom::new();
        let div = dom.create_html_element("div", &[("id", "main")]);
        dom.append(dom.document(), div);

        assert_eq!(dom.element_name(div).unwrap().as_ref(), "div");
        assert_eq!(dom.element_id(div), Some("main"));
        assert_eq!(dom.get_by_id("main"), Some(div));
    }

    #[test]
    fn test_detached_element_not_found_by_id() {
        let mut dom = ArenaDom::new();
        let div = dom.create_html_element("div", &[("id", "floating")]);
        assert_eq!(dom.get_by_id("floating"), None);

        dom.append(dom.document(), div);
        assert_eq!(dom.get_by_id("floating"), Some(div));

        dom.detach(div);
        assert_eq!(dom.get_by_id("floating"), None);
    }

    #[test]
    fn test_duplicate_ids_resolve_in_tree_order() {
        let mut dom = ArenaDom::new();
        let body = dom.create_html_element("body", &[]);
        let first = dom.create_html_element("p", &[]);
        let second = dom.create_html_element("p", &[("id", "dup")]);
        dom.append(dom.document(), body);
        dom.append(body, first);
        dom.append(body, second);
        // `first` gets the id later, but sits earlier in the tree.
        dom.set_attr(first, "id", "dup");

        assert_eq!(dom.get_by_id("dup"), Some(first));
    }

    #[test]
    fn test_descendants_preorder() {
        let mut dom = ArenaDom::new();
        let a = dom.create_html_element("div", &[]);
        let b = dom.create_html_element("p", &[]);
        let c = dom.create_html_element("span", &[]);
        let d = dom.create_html_element("p", &[]);
        dom.append(dom.document(), a);
        dom.append(a, b);
        dom.append(b, c);
        dom.append(a, d);

        let order: Vec<_> = dom.descendants(dom.document()).collect();
        assert_eq!(order, vec![a, b, c, d]);

        let under_b: Vec<_> = dom.descendants(b).collect();
        assert_eq!(under_b, vec![c]);
    }

    #[test]
    fn test_toggle_class_updates_attribute() {
        let mut dom = ArenaDom::new();
        let p = dom.create_html_element("p", &[("class", "stretchsummary")]);

        assert!(dom.toggle_class(p, "stretchtext-open"));
        assert_eq!(
            dom.get_attr(p, "class"),
            Some("stretchsummary stretchtext-open")
        );
        assert!(dom.has_class(p, "stretchtext-open"));

        assert!(!dom.toggle_class(p, "stretchtext-open"));
        assert_eq!(dom.get_attr(p, "class"), Some("stretchsummary"));
    }

    #[test]
    fn test_toggle_class_on_text_node_reports_absent() {
        let mut dom = ArenaDom::new();
        let text = dom.create_text("loose".to_string());

        assert!(!dom.toggle_class(text, "stretchtext-open"));
        assert!(!dom.has_class(text, "stretchtext-open"));
        assert!(!dom.toggle_class(text, "stretchtext-open"));
    }

    #[test]
    fn test_style_property_preserves_other_declarations() {
        let mut dom = ArenaDom::new();
        let div = dom.create_html_element("div", &[("style", "color: red; DISPLAY:none")]);

        assert_eq!(dom.style_property(div, "display").as_deref(), Some("none"));

        dom.set_style_property(div, "display", "block");
        assert_eq!(
            dom.get_attr(div, "style"),
            Some("color: red; display: block;")
        );

        dom.set_style_property(div, "color", "");
        dom.set_style_property(div, "display", "");
        assert!(!dom.has_attr(div, "style"));
    }

    #[test]
    fn test_next_element_sibling_skips_text() {
        let mut dom = ArenaDom::new();
        let parent = dom.create_html_element("div", &[]);
        let summary = dom.create_html_element("span", &[]);
        let detail = dom.create_html_element("span", &[]);
        dom.append(dom.document(), parent);
        dom.append(parent, summary);
        dom.append_text(parent, " ");
        dom.append(parent, detail);

        assert_eq!(dom.next_element_sibling(summary), Some(detail));
        assert_eq!(dom.next_element_sibling(detail), None);
        assert_eq!(dom.parent_element(summary), Some(parent));
        assert_eq!(dom.parent_element(parent), None);
    }

    #[test]
    fn test_text_merging() {
        let mut dom = ArenaDom::new();
        let p = dom.create_html_element("p", &[]);
        dom.append(dom.document(), p);

        dom.append_text(p, "Hello, ");
        dom.append_text(p, "World!");

        let children: Vec<_> = dom.children(p).collect();
        assert_eq!(children.len(), 1);
        assert_eq!(dom.text_content(children[0]), Some("Hello, World!"));
        assert_eq!(dom.inner_text(p), "Hello, World!");
    }
}

//! DOM tree implementation for the Magpie engine.
//!
//! This crate provides an arena-based DOM tree structure following the
//! [DOM Living Standard](https://dom.spec.whatwg.org/).
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all
//! relationships. A parent owns its children exclusively: detaching a child
//! with [`DomTree::remove_child`] unlinks it, clears its parent
//! back-reference, and hands the subtree's root id back to the caller. No
//! cross-tree back-references survive removal.
//!
//! Mutations that break the tree contract (removing a non-child, inserting
//! before a non-sibling) fail with a [`ContractViolation`] kind code rather
//! than panicking; malformed *content* never reaches this crate.

use std::collections::HashMap;
use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use magpie_common::ContractViolation;

/// Event objects and capture/target/bubble dispatch.
pub mod events;

/// A type-safe index into the DOM tree.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
/// "Each node has an associated node document..."
///
/// `NodeId` provides O(1) access to any node in the tree without borrowing
/// issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// Per-node invalidation flags.
///
/// A dirty bit records that some derived state (style, layout, paint) must
/// be recomputed for the node. Marking a node dirty also marks every
/// ancestor so the render pass can find invalidated subtrees from the root.
/// [`DomTree::clear_dirty`] clears only the target node; callers re-walk
/// during the render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirtyFlags(u8);

impl DirtyFlags {
    /// No recomputation needed.
    pub const NONE: Self = Self(0);
    /// Style must be re-resolved for this node.
    pub const STYLE: Self = Self(1);
    /// Layout must be re-solved for this node.
    pub const LAYOUT: Self = Self(1 << 1);
    /// The node must be repainted.
    pub const PAINT: Self = Self(1 << 2);

    /// True if no flag is set.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if every flag in `other` is also set on `self`.
    #[must_use]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for DirtyFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for DirtyFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for DirtyFlags {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

/// An attribute on an element.
///
/// [§ 4.9.1 Interface Attr](https://dom.spec.whatwg.org/#interface-attr)
/// "An Attr object represents an attribute of an Element object."
///
/// Attributes are kept in a `Vec` rather than a map so that insertion order
/// is observable, which the serializer and devtools-style dumps rely on.
/// Uniqueness by name is maintained by [`DomTree::set_attribute`]'s
/// overwrite-in-place semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// The attribute name, lowercased at set time.
    pub name: String,
    /// The attribute value.
    pub value: String,
}

/// An ordered set of class names derived from the `class` attribute.
///
/// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
/// "An element's classList getter returns a `DOMTokenList`..."
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    items: Vec<String>,
}

impl ClassList {
    /// Build a class list from a space-separated attribute value.
    #[must_use]
    pub fn from_attribute(value: &str) -> Self {
        let mut list = Self::default();
        for token in value.split_ascii_whitespace() {
            list.add(token);
        }
        list
    }

    /// Add a class if not already present.
    pub fn add(&mut self, class: &str) {
        if !self.contains(class) {
            self.items.push(class.to_string());
        }
    }

    /// Remove a class if present.
    pub fn remove(&mut self, class: &str) {
        self.items.retain(|c| c != class);
    }

    /// Add the class if absent, remove it if present. Returns true if the
    /// class is present after the call.
    pub fn toggle(&mut self, class: &str) -> bool {
        if self.contains(class) {
            self.remove(class);
            false
        } else {
            self.add(class);
            true
        }
    }

    /// True if the class is present.
    #[must_use]
    pub fn contains(&self, class: &str) -> bool {
        self.items.iter().any(|c| c == class)
    }

    /// Number of classes in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the list holds no classes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The class names in insertion order.
    #[must_use]
    pub fn items(&self) -> &[String] {
        &self.items
    }
}

impl fmt::Display for ClassList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.items.join(" "))
    }
}

/// Element-specific data.
///
/// Per [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element):
/// "Elements have an associated namespace, namespace prefix, local name..."
///
/// The pseudo-element flags are set only by style resolution when a
/// `::first-letter` / `::first-line` / `::before` / `::after` rule matches;
/// the DOM itself never touches them.
#[derive(Debug, Clone, Default)]
pub struct ElementData {
    /// "An element's local name", lowercased.
    pub tag_name: String,
    /// "Elements have an associated namespace" — empty for HTML elements.
    pub namespace_uri: String,
    /// "An element has an associated attribute list", in insertion order.
    pub attributes: Vec<Attribute>,
    /// Class set derived from the `class` attribute.
    pub class_list: ClassList,
    /// A `::first-letter` rule applies to this element.
    pub has_first_letter: bool,
    /// A `::first-line` rule applies to this element.
    pub has_first_line: bool,
    /// A `::before` rule applies to this element.
    pub has_before: bool,
    /// A `::after` rule applies to this element.
    pub has_after: bool,
}

impl ElementData {
    /// The element's `id` attribute value, if present.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.get_attribute("id")
    }

    /// Look up an attribute value by (lowercase) name.
    #[must_use]
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// True if an attribute with the given (lowercase) name exists.
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
    }
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Each node has an associated node type"
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
    Document,
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    Element(ElementData),
    /// [§ 4.10 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    /// with its mutable character data.
    Text(String),
    /// [§ 4.7 Interface Comment](https://dom.spec.whatwg.org/#interface-comment)
    /// with its mutable character data.
    Comment(String),
}

/// A node in the arena.
///
/// Stores indices for parent/child/sibling relationships, enabling O(1)
/// traversal in any direction. The sibling links are redundant with the
/// parent's child vector and are kept consistent by every mutation:
/// `prev.next_sibling == me` and `next.prev_sibling == me` always hold.
#[derive(Debug, Clone)]
pub struct Node {
    /// The node's type and type-specific payload.
    pub kind: NodeKind,
    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-parent)
    /// "An object that participates in a tree has a parent, which is either
    /// null or an object."
    pub parent: Option<NodeId>,
    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-child)
    /// "A node has an associated list of children"
    pub children: Vec<NodeId>,
    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-previous-sibling)
    pub prev_sibling: Option<NodeId>,
    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-next-sibling)
    pub next_sibling: Option<NodeId>,
    /// Invalidation flags; see [`DirtyFlags`].
    pub dirty: DirtyFlags,
}

impl Node {
    fn detached(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            prev_sibling: None,
            next_sibling: None,
            dirty: DirtyFlags::NONE,
        }
    }
}

/// Arena-based DOM tree with O(1) node access and traversal.
///
/// [§ 4 Nodes](https://dom.spec.whatwg.org/#nodes)
/// "The DOM represents a document as a tree."
///
/// The Document node always sits at index 0 ([`NodeId::ROOT`]). The id
/// index is an explicit map: callers [`DomTree::register_id`] after
/// inserting an element rather than the tree walking itself, which avoids a
/// global invariant violation when an id attribute is set before the
/// element is inserted.
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
    ids: HashMap<String, NodeId>,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    /// Create a new DOM tree with just the Document node at the root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::detached(NodeKind::Document)],
            ids: HashMap::new(),
        }
    }

    /// Get the root document node ID.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Number of nodes allocated in the arena (including detached ones).
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the arena is empty. A freshly created tree always has at
    /// least the Document node, so this is false in practice.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ------------------------------------------------------------------
    // Node factories
    // ------------------------------------------------------------------

    /// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#dom-document-createelement)
    ///
    /// "The createElement(localName) method steps are..."
    ///
    /// Allocate a detached element. The tag name is lowercased, matching the
    /// tokenizer's output for HTML content.
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.create_element_ns(tag_name, "")
    }

    /// [§ 4.5](https://dom.spec.whatwg.org/#dom-document-createelementns)
    ///
    /// Allocate a detached element with a namespace URI (used for `<svg>`
    /// and `<math>` subtrees).
    pub fn create_element_ns(&mut self, tag_name: &str, namespace_uri: &str) -> NodeId {
        self.alloc(NodeKind::Element(ElementData {
            tag_name: tag_name.to_ascii_lowercase(),
            namespace_uri: namespace_uri.to_string(),
            ..ElementData::default()
        }))
    }

    /// [§ 4.5](https://dom.spec.whatwg.org/#dom-document-createtextnode)
    ///
    /// Allocate a detached text node.
    pub fn create_text(&mut self, data: &str) -> NodeId {
        self.alloc(NodeKind::Text(data.to_string()))
    }

    /// [§ 4.5](https://dom.spec.whatwg.org/#dom-document-createcomment)
    ///
    /// Allocate a detached comment node.
    pub fn create_comment(&mut self, data: &str) -> NodeId {
        self.alloc(NodeKind::Comment(data.to_string()))
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::detached(kind));
        id
    }

    // ------------------------------------------------------------------
    // Tree mutation
    // ------------------------------------------------------------------

    /// [§ 4.2.2 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// "To append a node to a parent, pre-insert node into parent before
    /// null."
    ///
    /// The child becomes the parent's last child; its parent pointer is set
    /// and the sibling links of the previous last child are updated.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let prev_last = self.nodes[parent.0].children.last().copied();

        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[child.0].next_sibling = None;
        self.nodes[child.0].prev_sibling = prev_last;

        if let Some(prev_id) = prev_last {
            self.nodes[prev_id.0].next_sibling = Some(child);
        }
    }

    /// [§ 4.2.1 Insert](https://dom.spec.whatwg.org/#concept-node-insert)
    ///
    /// Splice `child` into `parent`'s child list immediately before
    /// `reference`. A `None` reference is equivalent to
    /// [`DomTree::append_child`].
    ///
    /// # Errors
    ///
    /// [`ContractViolation::BadReference`] if `reference` is not currently a
    /// child of `parent`.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), ContractViolation> {
        let Some(reference) = reference else {
            self.append_child(parent, child);
            return Ok(());
        };

        let Some(index) = self.nodes[parent.0]
            .children
            .iter()
            .position(|&c| c == reference)
        else {
            return Err(ContractViolation::BadReference);
        };

        let before = self.nodes[reference.0].prev_sibling;

        self.nodes[parent.0].children.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[child.0].prev_sibling = before;
        self.nodes[child.0].next_sibling = Some(reference);
        self.nodes[reference.0].prev_sibling = Some(child);
        if let Some(before_id) = before {
            self.nodes[before_id.0].next_sibling = Some(child);
        }
        Ok(())
    }

    /// [§ 4.2.3 Remove](https://dom.spec.whatwg.org/#concept-node-remove)
    ///
    /// Unlink `child` from `parent` and return its id to the caller. The
    /// child's parent back-reference is cleared before ownership is
    /// yielded; the siblings around it are re-linked.
    ///
    /// # Errors
    ///
    /// [`ContractViolation::NotAChild`] if `child` is not currently a child
    /// of `parent`.
    pub fn remove_child(
        &mut self,
        parent: NodeId,
        child: NodeId,
    ) -> Result<NodeId, ContractViolation> {
        let Some(index) = self.nodes[parent.0]
            .children
            .iter()
            .position(|&c| c == child)
        else {
            return Err(ContractViolation::NotAChild);
        };

        let _ = self.nodes[parent.0].children.remove(index);

        let prev = self.nodes[child.0].prev_sibling;
        let next = self.nodes[child.0].next_sibling;
        if let Some(prev_id) = prev {
            self.nodes[prev_id.0].next_sibling = next;
        }
        if let Some(next_id) = next {
            self.nodes[next_id.0].prev_sibling = prev;
        }

        self.nodes[child.0].parent = None;
        self.nodes[child.0].prev_sibling = None;
        self.nodes[child.0].next_sibling = None;
        Ok(child)
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    /// [§ 4.9](https://dom.spec.whatwg.org/#dom-element-setattribute)
    ///
    /// "Change attr's value to value" — setting an existing name updates
    /// the attribute in place, preserving its position in the list; a new
    /// name appends. The name is lowercased. Side effects:
    ///
    /// - `id` keeps the document id index in sync (the old id is
    ///   unregistered first).
    /// - `class` rebuilds the element's class list.
    /// - The element is marked [`DirtyFlags::STYLE`], which propagates to
    ///   every ancestor.
    ///
    /// Does nothing if `id` is not an element.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();

        // Unregister the previous id before it is overwritten.
        if name == "id" {
            if let Some(old) = self.get_attribute(id, "id").map(str::to_string) {
                let _ = self.ids.remove(&old);
            }
        }

        let NodeKind::Element(data) = &mut self.nodes[id.0].kind else {
            return;
        };

        if let Some(attr) = data.attributes.iter_mut().find(|a| a.name == name) {
            attr.value = value.to_string();
        } else {
            data.attributes.push(Attribute {
                name: name.clone(),
                value: value.to_string(),
            });
        }

        if name == "class" {
            data.class_list = ClassList::from_attribute(value);
        }
        if name == "id" {
            self.register_id(value, id);
        }

        self.mark_dirty(id, DirtyFlags::STYLE);
    }

    /// [§ 4.9](https://dom.spec.whatwg.org/#dom-element-removeattribute)
    ///
    /// Remove an attribute by (lowercase) name. Removing `id` also clears
    /// the id-index entry; removing `class` empties the class list. Marks
    /// the element style-dirty.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        let name = name.to_ascii_lowercase();

        let NodeKind::Element(data) = &mut self.nodes[id.0].kind else {
            return;
        };

        let Some(index) = data.attributes.iter().position(|a| a.name == name) else {
            return;
        };
        let removed = data.attributes.remove(index);

        if name == "class" {
            data.class_list = ClassList::default();
        }
        if name == "id" {
            let _ = self.ids.remove(&removed.value);
        }

        self.mark_dirty(id, DirtyFlags::STYLE);
    }

    /// Look up an attribute value on an element node.
    #[must_use]
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.as_element(id)?.get_attribute(name)
    }

    /// True if the element has the named attribute.
    #[must_use]
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.as_element(id).is_some_and(|e| e.has_attribute(name))
    }

    // ------------------------------------------------------------------
    // Id index
    // ------------------------------------------------------------------

    /// Register an element under an id.
    ///
    /// The index is an explicit map rather than a derived view of the tree:
    /// the tree builder registers ids after inserting each element. A later
    /// registration for the same id wins.
    pub fn register_id(&mut self, id_value: &str, node: NodeId) {
        if id_value.is_empty() {
            return;
        }
        let _ = self.ids.insert(id_value.to_string(), node);
    }

    /// Remove an id from the index.
    pub fn unregister_id(&mut self, id_value: &str) {
        let _ = self.ids.remove(id_value);
    }

    /// [§ 4.5](https://dom.spec.whatwg.org/#dom-nonelementparentnode-getelementbyid)
    ///
    /// "Returns the first element within node's descendants whose ID is
    /// elementId." Here: the most recently registered element for the id.
    #[must_use]
    pub fn get_element_by_id(&self, id_value: &str) -> Option<NodeId> {
        self.ids.get(id_value).copied()
    }

    // ------------------------------------------------------------------
    // Dirty flags
    // ------------------------------------------------------------------

    /// OR `flags` into the node and every ancestor up to the root.
    pub fn mark_dirty(&mut self, id: NodeId, flags: DirtyFlags) {
        let mut current = Some(id);
        while let Some(node_id) = current {
            self.nodes[node_id.0].dirty |= flags;
            current = self.nodes[node_id.0].parent;
        }
    }

    /// Clear all dirty flags on the target node only. Ancestors keep their
    /// flags; the render pass clears them as it descends.
    pub fn clear_dirty(&mut self, id: NodeId) {
        self.nodes[id.0].dirty = DirtyFlags::NONE;
    }

    /// The node's current dirty flags.
    #[must_use]
    pub fn dirty_flags(&self, id: NodeId) -> DirtyFlags {
        self.get(id).map_or(DirtyFlags::NONE, |n| n.dirty)
    }

    // ------------------------------------------------------------------
    // Traversal
    // ------------------------------------------------------------------

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Get the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.first().copied())
    }

    /// Get the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.last().copied())
    }

    /// Get the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// Get the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// Number of children of a node.
    #[must_use]
    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).len()
    }

    /// Invoke `f` for each child of `id` in order.
    pub fn for_each_child<F: FnMut(NodeId)>(&self, id: NodeId, mut f: F) {
        for &child in self.children(id) {
            f(child);
        }
    }

    /// [§ 4.2.6 Descendant](https://dom.spec.whatwg.org/#concept-tree-descendant)
    ///
    /// Check if `descendant` is a descendant of `ancestor` by walking up
    /// the parent chain.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        let mut current = self.parent(descendant);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// [§ 4.2.5 Ancestor](https://dom.spec.whatwg.org/#concept-tree-ancestor)
    ///
    /// Returns an iterator over all ancestors of a node, from parent to
    /// root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Returns an iterator over preceding siblings, from immediately before
    /// back to the parent's first child.
    #[must_use]
    pub fn preceding_siblings(&self, id: NodeId) -> PrecedingSiblingIterator<'_> {
        PrecedingSiblingIterator {
            tree: self,
            current: self.prev_sibling(id),
        }
    }

    /// [§ 4.2.4 Tree order](https://dom.spec.whatwg.org/#concept-tree-order)
    ///
    /// Returns an iterator over all descendants of a node in document order
    /// (depth-first, pre-order). Does not include the starting node.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> DescendantIterator<'_> {
        DescendantIterator {
            tree: self,
            stack: self.children(id).iter().rev().copied().collect(),
        }
    }

    // ------------------------------------------------------------------
    // Typed accessors
    // ------------------------------------------------------------------

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get mutable element data if this node is an element.
    pub fn as_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(|n| match &mut n.kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get character data if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.kind {
            NodeKind::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Get character data if this node is a comment node.
    #[must_use]
    pub fn as_comment(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.kind {
            NodeKind::Comment(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Replace the character data of a text or comment node.
    pub fn set_character_data(&mut self, id: NodeId, data: &str) {
        if let Some(node) = self.get_mut(id) {
            match &mut node.kind {
                NodeKind::Text(s) | NodeKind::Comment(s) => {
                    data.clone_into(s);
                }
                _ => {}
            }
        }
    }

    /// [§ 4.4](https://dom.spec.whatwg.org/#dom-node-textcontent)
    ///
    /// "The textContent getter... returns the descendant text content."
    ///
    /// Concatenation of descendant `Text` data in document order. Comment
    /// nodes contribute nothing.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(text) = self.as_text(id) {
            out.push_str(text);
        }
        for descendant in self.descendants(id) {
            if let Some(text) = self.as_text(descendant) {
                out.push_str(text);
            }
        }
        out
    }

    // ------------------------------------------------------------------
    // Document accessors
    // ------------------------------------------------------------------

    /// [§ 3.1.1 The document element](https://html.spec.whatwg.org/multipage/dom.html#the-html-element-2)
    ///
    /// "The document element of a document is the element whose parent is
    /// that document, if it exists; otherwise null." In practice the
    /// `<html>` element.
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(NodeId::ROOT)
            .iter()
            .find(|&&id| self.as_element(id).is_some())
            .copied()
    }

    /// [§ 3.1.3 The head element](https://html.spec.whatwg.org/multipage/dom.html#the-head-element-2)
    ///
    /// The first `head` child of the document element.
    #[must_use]
    pub fn head(&self) -> Option<NodeId> {
        let html = self.document_element()?;
        self.children(html)
            .iter()
            .find(|&&id| self.as_element(id).is_some_and(|e| e.tag_name == "head"))
            .copied()
    }

    /// [§ 3.1.3 The body element](https://html.spec.whatwg.org/multipage/dom.html#the-body-element-2)
    ///
    /// "The body element of a document is the first of the html element's
    /// children that is either a body element or a frameset element."
    #[must_use]
    pub fn body(&self) -> Option<NodeId> {
        let html = self.document_element()?;
        self.children(html)
            .iter()
            .find(|&&id| {
                self.as_element(id)
                    .is_some_and(|e| e.tag_name == "body" || e.tag_name == "frameset")
            })
            .copied()
    }
}

/// Iterator that walks up the tree from a node to the root.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Iterator that walks backwards through the preceding siblings of a node.
pub struct PrecedingSiblingIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for PrecedingSiblingIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.prev_sibling(id);
        Some(id)
    }
}

/// Iterator that walks a subtree in document order (depth-first, pre-order).
pub struct DescendantIterator<'a> {
    tree: &'a DomTree,
    /// Stack of nodes to visit (children are pushed in reverse order so we
    /// process them left-to-right).
    stack: Vec<NodeId>,
}

impl Iterator for DescendantIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let children = self.tree.children(id);
        self.stack.extend(children.iter().rev().copied());
        Some(id)
    }
}

//! Integration tests for DOM tree mutation and bookkeeping.

use magpie_common::ContractViolation;
use magpie_dom::{DirtyFlags, DomTree, NodeId, NodeKind};

#[test]
fn create_element_lowercases_tag_name() {
    let mut tree = DomTree::new();
    let div = tree.create_element("DIV");
    assert_eq!(tree.as_element(div).unwrap().tag_name, "div");
    assert_eq!(tree.as_element(div).unwrap().namespace_uri, "");
}

#[test]
fn create_element_with_namespace() {
    let mut tree = DomTree::new();
    let svg = tree.create_element_ns("svg", "http://www.w3.org/2000/svg");
    assert_eq!(
        tree.as_element(svg).unwrap().namespace_uri,
        "http://www.w3.org/2000/svg"
    );
}

#[test]
fn fresh_element_has_no_attributes() {
    let mut tree = DomTree::new();
    let div = tree.create_element("div");
    assert!(tree.as_element(div).unwrap().attributes.is_empty());
}

#[test]
fn append_child_links_parent_and_siblings() {
    let mut tree = DomTree::new();
    let parent = tree.create_element("div");
    let a = tree.create_element("p");
    let b = tree.create_element("p");
    let c = tree.create_element("p");
    tree.append_child(NodeId::ROOT, parent);
    tree.append_child(parent, a);
    tree.append_child(parent, b);
    tree.append_child(parent, c);

    assert_eq!(tree.child_count(parent), 3);
    assert_eq!(tree.first_child(parent), Some(a));
    assert_eq!(tree.last_child(parent), Some(c));
    assert_eq!(tree.parent(b), Some(parent));

    // Doubly-linked sibling order.
    assert_eq!(tree.prev_sibling(a), None);
    assert_eq!(tree.next_sibling(a), Some(b));
    assert_eq!(tree.prev_sibling(b), Some(a));
    assert_eq!(tree.next_sibling(b), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(b));
    assert_eq!(tree.next_sibling(c), None);
}

#[test]
fn insert_before_splices_into_sibling_chain() {
    let mut tree = DomTree::new();
    let parent = tree.create_element("div");
    let first = tree.create_element("p");
    let third = tree.create_element("p");
    tree.append_child(parent, first);
    tree.append_child(parent, third);

    let second = tree.create_element("p");
    tree.insert_before(parent, second, Some(third)).unwrap();

    assert_eq!(tree.children(parent), &[first, second, third]);
    assert_eq!(tree.next_sibling(first), Some(second));
    assert_eq!(tree.next_sibling(second), Some(third));
    assert_eq!(tree.prev_sibling(third), Some(second));
}

#[test]
fn insert_before_null_reference_appends() {
    let mut tree = DomTree::new();
    let parent = tree.create_element("div");
    let child = tree.create_element("p");
    tree.insert_before(parent, child, None).unwrap();
    assert_eq!(tree.first_child(parent), Some(child));
    assert_eq!(tree.last_child(parent), Some(child));
}

#[test]
fn insert_before_foreign_reference_fails() {
    let mut tree = DomTree::new();
    let parent = tree.create_element("div");
    let other = tree.create_element("div");
    let stranger = tree.create_element("p");
    tree.append_child(other, stranger);

    let child = tree.create_element("p");
    assert_eq!(
        tree.insert_before(parent, child, Some(stranger)),
        Err(ContractViolation::BadReference)
    );
}

#[test]
fn remove_child_unlinks_and_returns_ownership() {
    let mut tree = DomTree::new();
    let parent = tree.create_element("div");
    let child = tree.create_element("p");
    tree.append_child(parent, child);

    let removed = tree.remove_child(parent, child).unwrap();
    assert_eq!(removed, child);
    assert_eq!(tree.child_count(parent), 0);
    assert_eq!(tree.parent(child), None);
    assert_eq!(tree.prev_sibling(child), None);
    assert_eq!(tree.next_sibling(child), None);
}

#[test]
fn remove_middle_child_relinks_siblings() {
    let mut tree = DomTree::new();
    let parent = tree.create_element("div");
    let a = tree.create_element("p");
    let b = tree.create_element("p");
    let c = tree.create_element("p");
    tree.append_child(parent, a);
    tree.append_child(parent, b);
    tree.append_child(parent, c);

    let _ = tree.remove_child(parent, b).unwrap();
    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.next_sibling(a), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(a));
}

#[test]
fn remove_non_child_fails() {
    let mut tree = DomTree::new();
    let parent = tree.create_element("div");
    let stranger = tree.create_element("p");
    assert_eq!(
        tree.remove_child(parent, stranger),
        Err(ContractViolation::NotAChild)
    );
}

#[test]
fn set_attribute_overwrites_in_place() {
    let mut tree = DomTree::new();
    let input = tree.create_element("input");
    tree.set_attribute(input, "type", "text");
    tree.set_attribute(input, "type", "password");

    let data = tree.as_element(input).unwrap();
    assert_eq!(data.attributes.len(), 1);
    assert_eq!(data.get_attribute("type"), Some("password"));
}

#[test]
fn attribute_names_are_lowercased() {
    let mut tree = DomTree::new();
    let div = tree.create_element("div");
    tree.set_attribute(div, "Data-Foo", "1");
    assert!(tree.has_attribute(div, "data-foo"));
    assert_eq!(tree.get_attribute(div, "data-foo"), Some("1"));
}

#[test]
fn attributes_preserve_insertion_order() {
    let mut tree = DomTree::new();
    let div = tree.create_element("div");
    tree.set_attribute(div, "c", "3");
    tree.set_attribute(div, "a", "1");
    tree.set_attribute(div, "b", "2");
    // Overwriting keeps the original position.
    tree.set_attribute(div, "c", "30");

    let names: Vec<&str> = tree
        .as_element(div)
        .unwrap()
        .attributes
        .iter()
        .map(|a| a.name.as_str())
        .collect();
    assert_eq!(names, ["c", "a", "b"]);
}

#[test]
fn remove_attribute_preserves_others() {
    let mut tree = DomTree::new();
    let div = tree.create_element("div");
    tree.set_attribute(div, "a", "1");
    tree.set_attribute(div, "b", "2");
    tree.remove_attribute(div, "a");
    assert!(!tree.has_attribute(div, "a"));
    assert_eq!(tree.get_attribute(div, "b"), Some("2"));
}

#[test]
fn id_attribute_maintains_document_index() {
    let mut tree = DomTree::new();
    let div = tree.create_element("div");
    tree.append_child(NodeId::ROOT, div);

    tree.set_attribute(div, "id", "main");
    assert_eq!(tree.get_element_by_id("main"), Some(div));

    // Overwriting the id re-points the index.
    tree.set_attribute(div, "id", "hero");
    assert_eq!(tree.get_element_by_id("main"), None);
    assert_eq!(tree.get_element_by_id("hero"), Some(div));
}

#[test]
fn removing_id_attribute_clears_accessor() {
    let mut tree = DomTree::new();
    let div = tree.create_element("div");
    tree.set_attribute(div, "id", "gone");
    assert_eq!(tree.get_element_by_id("gone"), Some(div));

    tree.remove_attribute(div, "id");
    assert_eq!(tree.get_element_by_id("gone"), None);
    assert_eq!(tree.as_element(div).unwrap().id(), None);
}

#[test]
fn explicit_register_and_unregister() {
    let mut tree = DomTree::new();
    let div = tree.create_element("div");
    tree.register_id("x", div);
    assert_eq!(tree.get_element_by_id("x"), Some(div));
    tree.unregister_id("x");
    assert_eq!(tree.get_element_by_id("x"), None);
}

#[test]
fn get_element_by_id_not_found() {
    let tree = DomTree::new();
    assert_eq!(tree.get_element_by_id("nope"), None);
}

#[test]
fn class_attribute_populates_class_list() {
    let mut tree = DomTree::new();
    let div = tree.create_element("div");
    tree.set_attribute(div, "class", "card  wide card");

    let classes = &tree.as_element(div).unwrap().class_list;
    assert!(classes.contains("card"));
    assert!(classes.contains("wide"));
    // Duplicates collapse; length reflects the unique set.
    assert_eq!(classes.len(), 2);
    assert_eq!(classes.to_string(), "card wide");
}

#[test]
fn class_list_add_remove_toggle() {
    let mut tree = DomTree::new();
    let div = tree.create_element("div");
    tree.set_attribute(div, "class", "a");

    let classes = &mut tree.as_element_mut(div).unwrap().class_list;
    classes.add("b");
    classes.add("b");
    assert_eq!(classes.len(), 2);

    classes.remove("a");
    assert!(!classes.contains("a"));

    assert!(classes.toggle("c"));
    assert!(classes.contains("c"));
    assert!(!classes.toggle("c"));
    assert!(!classes.contains("c"));
}

#[test]
fn text_content_concatenates_descendants_in_document_order() {
    let mut tree = DomTree::new();
    let div = tree.create_element("div");
    let span = tree.create_element("span");
    let hello = tree.create_text("Hello, ");
    let world = tree.create_text("world");
    let bang = tree.create_text("!");
    tree.append_child(div, hello);
    tree.append_child(div, span);
    tree.append_child(span, world);
    tree.append_child(div, bang);

    assert_eq!(tree.text_content(div), "Hello, world!");
}

#[test]
fn text_content_ignores_comments() {
    let mut tree = DomTree::new();
    let div = tree.create_element("div");
    let text = tree.create_text("visible");
    let comment = tree.create_comment(" hidden ");
    tree.append_child(div, text);
    tree.append_child(div, comment);

    assert_eq!(tree.text_content(div), "visible");
    assert_eq!(tree.as_comment(comment), Some(" hidden "));
}

#[test]
fn set_character_data_replaces_text() {
    let mut tree = DomTree::new();
    let text = tree.create_text("before");
    tree.set_character_data(text, "after");
    assert_eq!(tree.as_text(text), Some("after"));
}

#[test]
fn dirty_flags_propagate_to_ancestors() {
    let mut tree = DomTree::new();
    let grandparent = tree.create_element("div");
    let parent = tree.create_element("section");
    let child = tree.create_element("p");
    tree.append_child(NodeId::ROOT, grandparent);
    tree.append_child(grandparent, parent);
    tree.append_child(parent, child);
    // Appends alone leave everything clean.
    assert!(tree.dirty_flags(child).is_empty());

    tree.mark_dirty(child, DirtyFlags::STYLE);

    assert!(tree.dirty_flags(child).contains(DirtyFlags::STYLE));
    assert!(tree.dirty_flags(parent).contains(DirtyFlags::STYLE));
    assert!(tree.dirty_flags(grandparent).contains(DirtyFlags::STYLE));
    assert!(tree.dirty_flags(NodeId::ROOT).contains(DirtyFlags::STYLE));
}

#[test]
fn clear_dirty_clears_only_the_target() {
    let mut tree = DomTree::new();
    let parent = tree.create_element("div");
    let child = tree.create_element("p");
    tree.append_child(NodeId::ROOT, parent);
    tree.append_child(parent, child);

    tree.mark_dirty(child, DirtyFlags::LAYOUT);
    tree.clear_dirty(child);

    assert!(tree.dirty_flags(child).is_empty());
    assert!(tree.dirty_flags(parent).contains(DirtyFlags::LAYOUT));
}

#[test]
fn dirty_flags_compose_as_a_bitset() {
    let mut tree = DomTree::new();
    let div = tree.create_element("div");
    tree.mark_dirty(div, DirtyFlags::STYLE);
    tree.mark_dirty(div, DirtyFlags::LAYOUT);

    let flags = tree.dirty_flags(div);
    assert!(flags.contains(DirtyFlags::STYLE));
    assert!(flags.contains(DirtyFlags::LAYOUT));
    assert!(!flags.contains(DirtyFlags::PAINT));
}

#[test]
fn set_attribute_marks_style_dirty() {
    let mut tree = DomTree::new();
    let parent = tree.create_element("div");
    let child = tree.create_element("p");
    tree.append_child(NodeId::ROOT, parent);
    tree.append_child(parent, child);

    tree.set_attribute(child, "class", "active");
    assert!(tree.dirty_flags(child).contains(DirtyFlags::STYLE));
    assert!(tree.dirty_flags(parent).contains(DirtyFlags::STYLE));
}

#[test]
fn document_element_and_body_accessors() {
    let mut tree = DomTree::new();
    let html = tree.create_element("html");
    let head = tree.create_element("head");
    let body = tree.create_element("body");
    tree.append_child(NodeId::ROOT, html);
    tree.append_child(html, head);
    tree.append_child(html, body);

    assert_eq!(tree.document_element(), Some(html));
    assert_eq!(tree.head(), Some(head));
    assert_eq!(tree.body(), Some(body));
}

#[test]
fn document_node_is_root() {
    let tree = DomTree::new();
    assert!(matches!(
        tree.get(NodeId::ROOT).unwrap().kind,
        NodeKind::Document
    ));
}

#[test]
fn ancestors_iterate_parent_to_root() {
    let mut tree = DomTree::new();
    let a = tree.create_element("div");
    let b = tree.create_element("section");
    let c = tree.create_element("p");
    tree.append_child(NodeId::ROOT, a);
    tree.append_child(a, b);
    tree.append_child(b, c);

    let chain: Vec<_> = tree.ancestors(c).collect();
    assert_eq!(chain, vec![b, a, NodeId::ROOT]);
}

#[test]
fn descendants_iterate_in_document_order() {
    let mut tree = DomTree::new();
    let div = tree.create_element("div");
    let a = tree.create_element("a");
    let b = tree.create_element("b");
    let a1 = tree.create_element("i");
    tree.append_child(NodeId::ROOT, div);
    tree.append_child(div, a);
    tree.append_child(div, b);
    tree.append_child(a, a1);

    let order: Vec<_> = tree.descendants(div).collect();
    assert_eq!(order, vec![a, a1, b]);
}

#[test]
fn for_each_child_visits_in_order() {
    let mut tree = DomTree::new();
    let div = tree.create_element("div");
    let a = tree.create_element("a");
    let b = tree.create_element("b");
    tree.append_child(div, a);
    tree.append_child(div, b);

    let mut seen = Vec::new();
    tree.for_each_child(div, |id| seen.push(id));
    assert_eq!(seen, vec![a, b]);
}

#[test]
fn every_child_appears_exactly_once_in_parent_list() {
    // Tree-consistency invariant: after arbitrary mutations, each node with
    // a parent appears exactly once in that parent's child list and the
    // sibling links agree with the list order.
    let mut tree = DomTree::new();
    let parent = tree.create_element("ul");
    let mut items = Vec::new();
    for _ in 0..5 {
        let li = tree.create_element("li");
        tree.append_child(parent, li);
        items.push(li);
    }
    let _ = tree.remove_child(parent, items[2]).unwrap();
    tree.insert_before(parent, items[2], Some(items[4])).unwrap();

    for &li in tree.children(parent) {
        let occurrences = tree.children(parent).iter().filter(|&&c| c == li).count();
        assert_eq!(occurrences, 1);
        assert_eq!(tree.parent(li), Some(parent));
        if let Some(prev) = tree.prev_sibling(li) {
            assert_eq!(tree.next_sibling(prev), Some(li));
        }
        if let Some(next) = tree.next_sibling(li) {
            assert_eq!(tree.prev_sibling(next), Some(li));
        }
    }
    assert_eq!(
        tree.prev_sibling(tree.first_child(parent).unwrap()),
        None
    );
    assert_eq!(tree.next_sibling(tree.last_child(parent).unwrap()), None);
}

use arbor::prelude::*;
use serde_json::json;

fn sample() -> TreeModel {
    TreeModel::new(
        vec![
            json!({"id": "r1", "name": "Root 1"}),
            json!({"id": "r2", "name": "Root 2", "isExpanded": true, "children": [
                {"id": "c1", "name": "Child 1"},
                {"id": "c2", "name": "Child 2", "isExpanded": true, "children": [
                    {"id": "g1", "name": "Grandchild 1"},
                    {"id": "g2", "name": "Grandchild 2"}
                ]}
            ]}),
            json!({"id": "r3", "name": "Root 3"}),
        ],
        TreeOptions::default(),
    )
}

fn node_id(model: &TreeModel, id: &str) -> NodeId {
    model
        .get_node_by_id(id)
        .unwrap_or_else(|| panic!("no node {id}"))
}

fn item(node: Option<NodeRef<'_>>) -> Option<String> {
    node.map(|n| n.item_id().to_string())
}

fn item_ids(model: &TreeModel, nodes: &[NodeId]) -> Vec<String> {
    nodes
        .iter()
        .filter_map(|id| model.node(*id))
        .map(|n| n.item_id().to_string())
        .collect()
}

fn assert_structure(model: &TreeModel) {
    for (i, root) in model.roots().iter().enumerate() {
        let node = model.node(*root).unwrap();
        assert_eq!(node.index(), i);
        assert!(node.is_root());
        assert_eq!(node.level(), 1);
    }
    for id in model.preorder(None) {
        let node = model.node(id).unwrap();
        for (i, child) in node.children().enumerate() {
            assert_eq!(child.index(), i);
            assert_eq!(child.parent_id(), Some(id));
            assert_eq!(child.level(), node.level() + 1);
        }
    }
}

// =============================================================================
// Structure
// =============================================================================

#[test]
fn test_structure_invariants_after_build() {
    let model = sample();
    assert_structure(&model);
    assert_eq!(model.node_count(), 7);
}

#[test]
fn test_level_and_path() {
    let model = sample();
    let g2 = model.node(node_id(&model, "g2")).unwrap();
    assert_eq!(g2.level(), 3);
    let path: Vec<String> = g2.path().iter().map(|p| p.to_string()).collect();
    assert_eq!(path, vec!["r2", "c2", "g2"]);
}

#[test]
fn test_derived_flags() {
    let model = sample();
    let r1 = model.node(node_id(&model, "r1")).unwrap();
    let r2 = model.node(node_id(&model, "r2")).unwrap();
    let c1 = model.node(node_id(&model, "c1")).unwrap();

    assert!(r1.is_leaf());
    assert!(!r1.has_children());
    assert!(r1.is_collapsed());
    assert!(r2.has_children());
    assert!(r2.is_expanded());
    assert!(!c1.is_root());
    assert_eq!(c1.display_field().as_deref(), Some("Child 1"));
}

#[test]
fn test_is_descendant_of() {
    let model = sample();
    let r2 = node_id(&model, "r2");
    let c2 = node_id(&model, "c2");
    let g1 = model.node(node_id(&model, "g1")).unwrap();

    assert!(g1.is_descendant_of(r2));
    assert!(g1.is_descendant_of(c2));
    assert!(!g1.is_descendant_of(node_id(&model, "r1")));
    assert!(!model.node(r2).unwrap().is_descendant_of(g1.id()));
}

// =============================================================================
// Siblings and Children
// =============================================================================

#[test]
fn test_siblings() {
    let model = sample();
    let r2 = model.node(node_id(&model, "r2")).unwrap();
    assert_eq!(item(r2.find_next_sibling(true)).as_deref(), Some("r3"));
    assert_eq!(item(r2.find_previous_sibling(true)).as_deref(), Some("r1"));

    let r3 = model.node(node_id(&model, "r3")).unwrap();
    assert!(r3.find_next_sibling(true).is_none());
    let r1 = model.node(node_id(&model, "r1")).unwrap();
    assert!(r1.find_previous_sibling(true).is_none());
}

#[test]
fn test_siblings_skip_hidden() {
    let mut model = sample();
    let r2 = node_id(&model, "r2");
    model.hide(r2);

    let r1 = model.node(node_id(&model, "r1")).unwrap();
    assert_eq!(item(r1.find_next_sibling(true)).as_deref(), Some("r3"));
    assert_eq!(item(r1.find_next_sibling(false)).as_deref(), Some("r2"));
}

#[test]
fn test_first_and_last_child() {
    let mut model = sample();
    let c2 = node_id(&model, "c2");
    {
        let node = model.node(c2).unwrap();
        assert_eq!(item(node.get_first_child(true)).as_deref(), Some("g1"));
        assert_eq!(item(node.get_last_child(true)).as_deref(), Some("g2"));
    }

    let g1 = node_id(&model, "g1");
    let g2 = node_id(&model, "g2");
    model.hide(g1);
    model.hide(g2);
    let node = model.node(c2).unwrap();
    assert!(node.get_first_child(true).is_none());
    assert!(node.get_last_child(true).is_none());
    assert_eq!(item(node.get_first_child(false)).as_deref(), Some("g1"));

    let r1 = model.node(node_id(&model, "r1")).unwrap();
    assert!(r1.get_first_child(false).is_none());
}

// =============================================================================
// Next / Previous
// =============================================================================

#[test]
fn test_next_node_from_collapsed_root_is_next_root() {
    let model = TreeModel::new(
        vec![
            json!({"id": "r1"}),
            json!({"id": "r2", "isExpanded": true, "children": [{"id": "a"}, {"id": "b"}]}),
            json!({"id": "r3"}),
        ],
        TreeOptions::default(),
    );
    let r1 = model.node(node_id(&model, "r1")).unwrap();
    assert_eq!(item(r1.find_next_node(true)).as_deref(), Some("r2"));

    let r2 = model.node(node_id(&model, "r2")).unwrap();
    assert_eq!(item(r2.find_next_node(true)).as_deref(), Some("a"));
    assert_eq!(item(r2.find_next_node(false)).as_deref(), Some("r3"));
}

#[test]
fn test_next_node_walks_up_ancestors() {
    let model = sample();
    let g2 = model.node(node_id(&model, "g2")).unwrap();
    assert_eq!(item(g2.find_next_node(true)).as_deref(), Some("r3"));

    let r3 = model.node(node_id(&model, "r3")).unwrap();
    assert!(r3.find_next_node(true).is_none());
}

#[test]
fn test_next_node_skips_collapsed_subtree() {
    let mut model = sample();
    let r2 = node_id(&model, "r2");
    model.collapse(r2);
    let node = model.node(r2).unwrap();
    assert_eq!(item(node.find_next_node(true)).as_deref(), Some("r3"));
}

#[test]
fn test_previous_node_is_deepest_open_descendant() {
    let model = sample();
    let r3 = model.node(node_id(&model, "r3")).unwrap();
    assert_eq!(item(r3.find_previous_node(true)).as_deref(), Some("g2"));

    let c1 = model.node(node_id(&model, "c1")).unwrap();
    assert_eq!(item(c1.find_previous_node(true)).as_deref(), Some("r2"));

    let r1 = model.node(node_id(&model, "r1")).unwrap();
    assert!(r1.find_previous_node(true).is_none());
}

#[test]
fn test_previous_node_skips_hidden() {
    let mut model = sample();
    let g2 = node_id(&model, "g2");
    model.hide(g2);
    let r3 = model.node(node_id(&model, "r3")).unwrap();
    assert_eq!(item(r3.find_previous_node(true)).as_deref(), Some("g1"));
    assert_eq!(item(r3.find_previous_node(false)).as_deref(), Some("g2"));
}

#[test]
fn test_next_then_previous_returns_to_start() {
    let mut model = sample();
    let c1 = node_id(&model, "c1");
    model.hide(c1);

    let sequence = model.visible_sequence();
    for pair in sequence.windows(2) {
        let next = model.node(pair[0]).unwrap().find_next_node(true).unwrap();
        assert_eq!(next.id(), pair[1]);
        let back = next.find_previous_node(true).unwrap();
        assert_eq!(back.id(), pair[0]);
    }
}

#[test]
fn test_visible_sequence() {
    let mut model = sample();
    assert_eq!(
        item_ids(&model, &model.visible_sequence()),
        vec!["r1", "r2", "c1", "c2", "g1", "g2", "r3"]
    );

    let c2 = node_id(&model, "c2");
    model.collapse(c2);
    let r1 = node_id(&model, "r1");
    model.hide(r1);
    assert_eq!(
        item_ids(&model, &model.visible_sequence()),
        vec!["r2", "c1", "c2", "r3"]
    );
}

// =============================================================================
// Lookup
// =============================================================================

#[test]
fn test_get_node_by_path() {
    let model = sample();
    let path = [ItemId::from("r2"), ItemId::from("c2"), ItemId::from("g1")];
    let found = model.get_node_by_path(&path, None);
    assert_eq!(found, Some(node_id(&model, "g1")));

    let missing = [ItemId::from("r2"), ItemId::from("nope")];
    assert!(model.get_node_by_path(&missing, None).is_none());

    let past_leaf = [ItemId::from("r1"), ItemId::from("c1")];
    assert!(model.get_node_by_path(&past_leaf, None).is_none());
}

#[test]
fn test_get_node_by_path_from_start_node() {
    let model = sample();
    let r2 = node_id(&model, "r2");
    let found = model.get_node_by_path(&[ItemId::from("c1")], Some(r2));
    assert_eq!(found, Some(node_id(&model, "c1")));

    assert_eq!(model.get_node_by_path(&[], Some(r2)), Some(r2));
    assert_eq!(model.get_node_by_path(&[], None), None);
}

#[test]
fn test_get_node_by_predicate() {
    let model = sample();
    let found = model.get_node_by(
        |node| node.display_field().is_some_and(|name| name.starts_with("Grand")),
        None,
    );
    assert_eq!(found, Some(node_id(&model, "g1")));

    let c2 = node_id(&model, "c2");
    let below = model.get_node_by(|node| node.level() >= 2, Some(c2));
    assert_eq!(below, Some(node_id(&model, "g1")));

    assert!(model.get_node_by(|node| node.level() > 5, None).is_none());
}

#[test]
fn test_get_node_by_id_numeric() {
    let model = TreeModel::new(
        vec![json!({"id": 7, "children": [{"id": 8}]})],
        TreeOptions::default(),
    );
    let eight = model.get_node_by_id("8").unwrap();
    assert_eq!(model.node(eight).unwrap().level(), 2);
    assert!(model.get_node_by_id("9").is_none());
}

#[test]
fn test_roots_queries() {
    let mut model = sample();
    assert!(!model.is_empty_tree());
    assert_eq!(model.get_first_root(true), Some(node_id(&model, "r1")));
    assert_eq!(model.get_last_root(true), Some(node_id(&model, "r3")));

    let r1 = node_id(&model, "r1");
    let r3 = node_id(&model, "r3");
    model.hide(r1);
    model.hide(r3);
    assert_eq!(model.get_first_root(true), Some(node_id(&model, "r2")));
    assert_eq!(model.get_last_root(true), Some(node_id(&model, "r2")));
    assert_eq!(model.get_first_root(false), Some(r1));
    assert_eq!(item_ids(&model, &model.get_visible_roots()), vec!["r2"]);

    let empty = TreeModel::new(Vec::new(), TreeOptions::default());
    assert!(empty.is_empty_tree());
    assert!(empty.visible_sequence().is_empty());
}

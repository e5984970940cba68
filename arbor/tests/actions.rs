use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use arbor::prelude::*;
use serde_json::json;

fn forest() -> Vec<RawItem> {
    vec![
        json!({"id": "r1", "name": "One"}),
        json!({"id": "r2", "name": "Two", "children": [
            {"id": "c1", "name": "Child"}
        ]}),
        json!({"id": "r3", "name": "Three"}),
    ]
}

fn sample() -> TreeModel {
    TreeModel::new(forest(), TreeOptions::default())
}

fn node_id(model: &TreeModel, id: &str) -> NodeId {
    model
        .get_node_by_id(id)
        .unwrap_or_else(|| panic!("no node {id}"))
}

fn click() -> InputEvent {
    InputEvent::mouse(MouseGesture::Click)
}

// =============================================================================
// Default Mouse Mapping
// =============================================================================

#[test]
fn test_click_is_single_select_toggle() {
    let mut model = sample();
    let r1 = node_id(&model, "r1");
    let r3 = node_id(&model, "r3");

    assert!(model.handle_input(r1, &click(), None));
    assert!(model.handle_input(r3, &click(), None));
    assert_eq!(model.active_nodes(), vec![r3]);

    assert!(model.handle_input(r3, &click(), None));
    assert!(model.active_nodes().is_empty());
}

#[test]
fn test_ctrl_click_adds_to_selection() {
    let mut model = sample();
    let r1 = node_id(&model, "r1");
    let r3 = node_id(&model, "r3");

    model.handle_input(r1, &click(), None);
    model.handle_input(r3, &click().ctrl(), None);
    assert_eq!(model.active_nodes(), vec![r1, r3]);
}

#[test]
fn test_expander_click_toggles_expansion() {
    let mut model = sample();
    let r2 = node_id(&model, "r2");
    let event = InputEvent::mouse(MouseGesture::ExpanderClick);

    model.handle_input(r2, &event, None);
    assert!(model.node(r2).unwrap().is_expanded());
    model.handle_input(r2, &event, None);
    assert!(model.node(r2).unwrap().is_collapsed());
}

#[test]
fn test_unmapped_gesture_does_nothing() {
    let mut model = sample();
    let r1 = node_id(&model, "r1");
    assert!(!model.handle_input(r1, &InputEvent::mouse(MouseGesture::DblClick), None));
    assert!(!model.handle_input(r1, &InputEvent::key(65), None));
    assert!(model.drain_events().is_empty());
}

#[test]
fn test_drop_moves_node() {
    let mut model = sample();
    let r1 = node_id(&model, "r1");
    let r2 = node_id(&model, "r2");
    let extra = ActionExtra::Move {
        from: r1,
        to: DropTarget::child_of(r2, 1),
    };

    assert!(model.handle_input(r2, &InputEvent::mouse(MouseGesture::Drop), Some(&extra)));
    let r2_node = model.node(r2).unwrap();
    let children: Vec<String> = r2_node.children().map(|n| n.item_id().to_string()).collect();
    assert_eq!(children, vec!["c1", "r1"]);
}

#[test]
fn test_drop_without_payload_changes_nothing() {
    let mut model = sample();
    let r2 = node_id(&model, "r2");
    let before = model.export_data();
    model.handle_input(r2, &InputEvent::mouse(MouseGesture::Drop), None);
    assert_eq!(model.export_data(), before);
}

// =============================================================================
// Default Key Mapping
// =============================================================================

#[test]
fn test_down_skips_hidden_sibling() {
    let mut model = sample();
    let r1 = node_id(&model, "r1");
    let r2 = node_id(&model, "r2");
    model.hide(r2);
    model.focus_node(r1);

    assert!(model.handle_input(r1, &InputEvent::key(keys::DOWN), None));
    assert_eq!(model.focused_node(), Some(node_id(&model, "r3")));

    model.handle_input(r1, &InputEvent::key(keys::UP), None);
    assert_eq!(model.focused_node(), Some(r1));
}

#[test]
fn test_right_expands_then_drills_down() {
    let mut model = sample();
    let r2 = node_id(&model, "r2");
    model.focus_node(r2);
    let right = InputEvent::key(keys::RIGHT);

    model.handle_input(r2, &right, None);
    assert!(model.node(r2).unwrap().is_expanded());
    assert_eq!(model.focused_node(), Some(r2));

    model.handle_input(r2, &right, None);
    assert_eq!(model.focused_node(), Some(node_id(&model, "c1")));
}

#[test]
fn test_left_collapses_then_drills_up() {
    let mut model = sample();
    let r2 = node_id(&model, "r2");
    let c1 = node_id(&model, "c1");
    model.expand(r2);
    model.focus_node(c1);
    let left = InputEvent::key(keys::LEFT);

    model.handle_input(c1, &left, None);
    assert_eq!(model.focused_node(), Some(r2));
    assert!(model.node(r2).unwrap().is_expanded());

    model.handle_input(r2, &left, None);
    assert!(model.node(r2).unwrap().is_collapsed());
    assert_eq!(model.focused_node(), Some(r2));
}

#[test]
fn test_space_and_enter_toggle_selection() {
    let mut model = sample();
    let r1 = node_id(&model, "r1");

    model.handle_input(r1, &InputEvent::key(keys::SPACE), None);
    assert!(model.node(r1).unwrap().is_active());
    model.handle_input(r1, &InputEvent::key(keys::ENTER), None);
    assert!(!model.node(r1).unwrap().is_active());
}

// =============================================================================
// Overrides
// =============================================================================

#[test]
fn test_null_suppresses_default() {
    let options =
        TreeOptions::from_json(r#"{"actionMapping": {"mouse": {"click": null}}}"#).unwrap();
    let mut model = TreeModel::new(forest(), options);
    let r1 = node_id(&model, "r1");

    assert!(!model.handle_input(r1, &click(), None));
    assert!(model.active_nodes().is_empty());

    // Untouched slots keep their defaults.
    let r2 = node_id(&model, "r2");
    assert!(model.handle_input(r2, &InputEvent::mouse(MouseGesture::ExpanderClick), None));
}

#[test]
fn test_json_key_override() {
    let options = TreeOptions::from_json(
        r#"{"actionMapping": {"keys": {"40": "previousNode", "38": null, "72": "collapse"}}}"#,
    )
    .unwrap();
    let mut model = TreeModel::new(forest(), options);
    let r2 = node_id(&model, "r2");
    model.focus_node(r2);

    model.handle_input(r2, &InputEvent::key(keys::DOWN), None);
    assert_eq!(model.focused_node(), Some(node_id(&model, "r1")));
    assert!(!model.handle_input(r2, &InputEvent::key(keys::UP), None));

    model.expand(r2);
    assert!(model.handle_input(r2, &InputEvent::key(72), None));
    assert!(model.node(r2).unwrap().is_collapsed());

    let mapping = &model.options().action_mapping;
    assert!(mapping.has_key_entry(keys::UP));
    assert!(mapping.key_action(keys::UP).is_none());
    assert!(mapping.key_action(keys::RIGHT).is_some());
}

#[test]
fn test_custom_handler() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let mapping = ActionMappingOptions::new().mouse(
        MouseGesture::DblClick,
        ActionOverride::handler(move |model, node, _event, _extra| {
            counter.fetch_add(1, Ordering::SeqCst);
            model.expand(node);
        }),
    );
    let mut model = TreeModel::new(forest(), TreeOptions::new().action_mapping(mapping));
    let r2 = node_id(&model, "r2");

    assert!(model.handle_input(r2, &InputEvent::mouse(MouseGesture::DblClick), None));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(model.node(r2).unwrap().is_expanded());
}

#[test]
fn test_builder_overrides() {
    let mapping = ActionMappingOptions::new()
        .mouse(MouseGesture::Click, BuiltinAction::Focus)
        .suppress_key(keys::SPACE)
        .key(keys::ENTER, BuiltinAction::Expand);
    let resolved = ActionMapping::resolve(&mapping);

    assert!(matches!(
        resolved.mouse_action(MouseGesture::Click),
        Some(Action::Builtin(BuiltinAction::Focus))
    ));
    assert!(resolved.key_action(keys::SPACE).is_none());
    assert!(matches!(
        resolved.key_action(keys::ENTER),
        Some(Action::Builtin(BuiltinAction::Expand))
    ));
    assert!(matches!(
        resolved.mouse_action(MouseGesture::Drop),
        Some(Action::Builtin(BuiltinAction::MoveNode))
    ));
}

#[test]
fn test_tree_handle_dispatch_marks_dirty() {
    let tree = Tree::from_data(forest(), TreeOptions::default());
    let r1 = tree.read(|model| node_id(model, "r1"));

    assert!(!tree.is_dirty());
    assert!(!tree.handle_input(r1, &InputEvent::mouse(MouseGesture::DblClick), None));
    assert!(!tree.is_dirty());

    assert!(tree.handle_input(r1, &click(), None));
    assert!(tree.is_dirty());
    assert!(tree.read(|model| model.node(r1).unwrap().is_active()));

    tree.clear_dirty();
    assert!(!tree.is_dirty());
}

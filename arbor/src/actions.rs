//! Action mapping and dispatch.
//!
//! Raw input (a mouse gesture or a numeric key code) is mapped to an
//! [`Action`]: either one of the built-in tree actions or a host-supplied
//! handler. User overrides are merged over the defaults slot by slot:
//!
//! - [`ActionOverride::Inherit`] keeps the default,
//! - [`ActionOverride::Use`] replaces it,
//! - [`ActionOverride::Suppress`] removes it, so the gesture does nothing.
//!
//! After resolution every mouse slot is either an action or `None`, and key
//! codes without an entry simply have no action.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use log::{debug, trace};
use serde::{Deserialize, Deserializer};

use crate::input::{InputEvent, MouseGesture, Trigger, keys};
use crate::model::{DropTarget, TreeModel};
use crate::node::NodeId;

/// Built-in tree actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BuiltinAction {
    /// Toggle activation; additive when ctrl/meta is held.
    ToggleSelected,
    /// Activate (single-select unless ctrl/meta is held).
    Select,
    /// Deactivate.
    Deselect,
    /// Focus the node.
    Focus,
    /// Toggle expansion (no-op without children).
    ToggleExpanded,
    Expand,
    Collapse,
    /// Expand the focused node, or move focus to its first visible child.
    DrillDown,
    /// Collapse the focused node, or move focus to its parent.
    DrillUp,
    /// Focus the next node in the visible sequence.
    NextNode,
    /// Focus the previous node in the visible sequence.
    PreviousNode,
    /// Move a dragged node to a drop target carried in the extra data.
    MoveNode,
}

/// Host-supplied action handler.
pub type ActionHandler =
    Arc<dyn Fn(&mut TreeModel, NodeId, &InputEvent, Option<&ActionExtra>) + Send + Sync>;

/// Extra data passed along with an input event.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionExtra {
    /// Drag-and-drop payload: which node is moved and where to.
    Move { from: NodeId, to: DropTarget },
}

/// An action bound to an input slot.
#[derive(Clone)]
pub enum Action {
    Builtin(BuiltinAction),
    Handler(ActionHandler),
}

impl Action {
    /// Wrap a handler closure.
    pub fn handler<F>(f: F) -> Self
    where
        F: Fn(&mut TreeModel, NodeId, &InputEvent, Option<&ActionExtra>) + Send + Sync + 'static,
    {
        Self::Handler(Arc::new(f))
    }

    /// Run the action against the model.
    pub fn run(
        &self,
        model: &mut TreeModel,
        node: NodeId,
        event: &InputEvent,
        extra: Option<&ActionExtra>,
    ) {
        match self {
            Action::Builtin(builtin) => run_builtin(*builtin, model, node, event, extra),
            Action::Handler(handler) => handler(model, node, event, extra),
        }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Builtin(builtin) => f.debug_tuple("Builtin").field(builtin).finish(),
            Action::Handler(_) => f.write_str("Handler(..)"),
        }
    }
}

impl From<BuiltinAction> for Action {
    fn from(builtin: BuiltinAction) -> Self {
        Action::Builtin(builtin)
    }
}

fn run_builtin(
    action: BuiltinAction,
    model: &mut TreeModel,
    node: NodeId,
    event: &InputEvent,
    extra: Option<&ActionExtra>,
) {
    let multi = event.modifiers.multi_select();
    match action {
        BuiltinAction::ToggleSelected => {
            model.toggle_activated(node, multi);
        }
        BuiltinAction::Select => {
            model.set_is_active(node, true, multi);
        }
        BuiltinAction::Deselect => {
            model.set_is_active(node, false, multi);
        }
        BuiltinAction::Focus => {
            model.focus_node(node);
        }
        BuiltinAction::ToggleExpanded => {
            model.toggle_expanded(node);
        }
        BuiltinAction::Expand => {
            model.expand(node);
        }
        BuiltinAction::Collapse => {
            model.collapse(node);
        }
        BuiltinAction::DrillDown => {
            let target = model.focused_node().unwrap_or(node);
            let collapsed_branch = model
                .node(target)
                .is_some_and(|n| n.is_collapsed() && n.has_children());
            if collapsed_branch {
                model.expand(target);
            } else {
                model.focus_drill_down();
            }
        }
        BuiltinAction::DrillUp => {
            let target = model.focused_node().unwrap_or(node);
            let expanded = model.node(target).is_some_and(|n| n.is_expanded());
            if expanded {
                model.collapse(target);
            } else {
                model.focus_drill_up();
            }
        }
        BuiltinAction::NextNode => {
            model.focus_next_node();
        }
        BuiltinAction::PreviousNode => {
            model.focus_previous_node();
        }
        BuiltinAction::MoveNode => match extra {
            Some(ActionExtra::Move { from, to }) => {
                model.move_node_with_event(*from, *to, Some(event));
            }
            _ => debug!("Move action on {:?} without a move payload, ignoring", node),
        },
    }
}

// =============================================================================
// Overrides
// =============================================================================

/// How a user mapping treats one slot.
#[derive(Debug, Clone, Default)]
pub enum ActionOverride {
    /// Keep the default action.
    #[default]
    Inherit,
    /// Explicitly do nothing for this slot.
    Suppress,
    /// Replace the default with this action.
    Use(Action),
}

impl ActionOverride {
    /// Override with a host handler.
    pub fn handler<F>(f: F) -> Self
    where
        F: Fn(&mut TreeModel, NodeId, &InputEvent, Option<&ActionExtra>) + Send + Sync + 'static,
    {
        Self::Use(Action::handler(f))
    }

    fn apply(&self, default: Option<Action>) -> Option<Action> {
        match self {
            ActionOverride::Inherit => default,
            ActionOverride::Suppress => None,
            ActionOverride::Use(action) => Some(action.clone()),
        }
    }
}

impl From<BuiltinAction> for ActionOverride {
    fn from(builtin: BuiltinAction) -> Self {
        Self::Use(Action::Builtin(builtin))
    }
}

impl From<Action> for ActionOverride {
    fn from(action: Action) -> Self {
        Self::Use(action)
    }
}

/// In JSON an override is a built-in action name or `null` (suppress).
/// Absent keys inherit through `#[serde(default)]` on the containing struct.
impl<'de> Deserialize<'de> for ActionOverride {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<BuiltinAction>::deserialize(deserializer)? {
            Some(builtin) => Self::Use(Action::Builtin(builtin)),
            None => Self::Suppress,
        })
    }
}

/// User overrides for mouse gestures.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MouseOverrides {
    pub click: ActionOverride,
    pub dbl_click: ActionOverride,
    pub context_menu: ActionOverride,
    pub expander_click: ActionOverride,
    pub drag_start: ActionOverride,
    pub drag: ActionOverride,
    pub drag_end: ActionOverride,
    pub drag_over: ActionOverride,
    pub drag_leave: ActionOverride,
    pub drag_enter: ActionOverride,
    pub drop: ActionOverride,
}

impl MouseOverrides {
    fn get(&self, gesture: MouseGesture) -> &ActionOverride {
        match gesture {
            MouseGesture::Click => &self.click,
            MouseGesture::DblClick => &self.dbl_click,
            MouseGesture::ContextMenu => &self.context_menu,
            MouseGesture::ExpanderClick => &self.expander_click,
            MouseGesture::DragStart => &self.drag_start,
            MouseGesture::Drag => &self.drag,
            MouseGesture::DragEnd => &self.drag_end,
            MouseGesture::DragOver => &self.drag_over,
            MouseGesture::DragLeave => &self.drag_leave,
            MouseGesture::DragEnter => &self.drag_enter,
            MouseGesture::Drop => &self.drop,
        }
    }

    fn get_mut(&mut self, gesture: MouseGesture) -> &mut ActionOverride {
        match gesture {
            MouseGesture::Click => &mut self.click,
            MouseGesture::DblClick => &mut self.dbl_click,
            MouseGesture::ContextMenu => &mut self.context_menu,
            MouseGesture::ExpanderClick => &mut self.expander_click,
            MouseGesture::DragStart => &mut self.drag_start,
            MouseGesture::Drag => &mut self.drag,
            MouseGesture::DragEnd => &mut self.drag_end,
            MouseGesture::DragOver => &mut self.drag_over,
            MouseGesture::DragLeave => &mut self.drag_leave,
            MouseGesture::DragEnter => &mut self.drag_enter,
            MouseGesture::Drop => &mut self.drop,
        }
    }
}

/// Sparse, user-facing action mapping.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ActionMappingOptions {
    pub mouse: MouseOverrides,
    pub keys: BTreeMap<u16, ActionOverride>,
}

impl ActionMappingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the action for a mouse gesture.
    pub fn mouse(mut self, gesture: MouseGesture, action: impl Into<ActionOverride>) -> Self {
        *self.mouse.get_mut(gesture) = action.into();
        self
    }

    /// Override the action for a key code.
    pub fn key(mut self, code: u16, action: impl Into<ActionOverride>) -> Self {
        self.keys.insert(code, action.into());
        self
    }

    /// Suppress a key code.
    pub fn suppress_key(mut self, code: u16) -> Self {
        self.keys.insert(code, ActionOverride::Suppress);
        self
    }
}

// =============================================================================
// Resolved mapping
// =============================================================================

/// Resolved mouse slots. `None` means the gesture does nothing.
#[derive(Debug, Clone, Default)]
pub struct MouseActions {
    pub click: Option<Action>,
    pub dbl_click: Option<Action>,
    pub context_menu: Option<Action>,
    pub expander_click: Option<Action>,
    pub drag_start: Option<Action>,
    pub drag: Option<Action>,
    pub drag_end: Option<Action>,
    pub drag_over: Option<Action>,
    pub drag_leave: Option<Action>,
    pub drag_enter: Option<Action>,
    pub drop: Option<Action>,
}

impl MouseActions {
    /// The action bound to a gesture.
    pub fn get(&self, gesture: MouseGesture) -> Option<&Action> {
        match gesture {
            MouseGesture::Click => self.click.as_ref(),
            MouseGesture::DblClick => self.dbl_click.as_ref(),
            MouseGesture::ContextMenu => self.context_menu.as_ref(),
            MouseGesture::ExpanderClick => self.expander_click.as_ref(),
            MouseGesture::DragStart => self.drag_start.as_ref(),
            MouseGesture::Drag => self.drag.as_ref(),
            MouseGesture::DragEnd => self.drag_end.as_ref(),
            MouseGesture::DragOver => self.drag_over.as_ref(),
            MouseGesture::DragLeave => self.drag_leave.as_ref(),
            MouseGesture::DragEnter => self.drag_enter.as_ref(),
            MouseGesture::Drop => self.drop.as_ref(),
        }
    }

    fn slot_mut(&mut self, gesture: MouseGesture) -> &mut Option<Action> {
        match gesture {
            MouseGesture::Click => &mut self.click,
            MouseGesture::DblClick => &mut self.dbl_click,
            MouseGesture::ContextMenu => &mut self.context_menu,
            MouseGesture::ExpanderClick => &mut self.expander_click,
            MouseGesture::DragStart => &mut self.drag_start,
            MouseGesture::Drag => &mut self.drag,
            MouseGesture::DragEnd => &mut self.drag_end,
            MouseGesture::DragOver => &mut self.drag_over,
            MouseGesture::DragLeave => &mut self.drag_leave,
            MouseGesture::DragEnter => &mut self.drag_enter,
            MouseGesture::Drop => &mut self.drop,
        }
    }
}

/// Fully-resolved action mapping.
#[derive(Debug, Clone)]
pub struct ActionMapping {
    pub mouse: MouseActions,
    pub keys: BTreeMap<u16, Option<Action>>,
}

impl Default for ActionMapping {
    fn default() -> Self {
        let mouse = MouseActions {
            click: Some(BuiltinAction::ToggleSelected.into()),
            expander_click: Some(BuiltinAction::ToggleExpanded.into()),
            drop: Some(BuiltinAction::MoveNode.into()),
            ..Default::default()
        };

        let keys = [
            (keys::RIGHT, BuiltinAction::DrillDown),
            (keys::LEFT, BuiltinAction::DrillUp),
            (keys::DOWN, BuiltinAction::NextNode),
            (keys::UP, BuiltinAction::PreviousNode),
            (keys::SPACE, BuiltinAction::ToggleSelected),
            (keys::ENTER, BuiltinAction::ToggleSelected),
        ]
        .into_iter()
        .map(|(code, action)| (code, Some(Action::Builtin(action))))
        .collect();

        Self { mouse, keys }
    }
}

impl ActionMapping {
    /// Merge user overrides over the default mapping.
    pub fn resolve(overrides: &ActionMappingOptions) -> Self {
        let mut mapping = Self::default();
        for gesture in MouseGesture::ALL {
            let slot = mapping.mouse.slot_mut(gesture);
            *slot = overrides.mouse.get(gesture).apply(slot.take());
        }
        for (code, over) in &overrides.keys {
            let default = mapping.keys.get(code).cloned().flatten();
            mapping.keys.insert(*code, over.apply(default));
        }
        mapping
    }

    /// The action bound to a mouse gesture.
    pub fn mouse_action(&self, gesture: MouseGesture) -> Option<&Action> {
        self.mouse.get(gesture)
    }

    /// The action bound to a key code.
    pub fn key_action(&self, code: u16) -> Option<&Action> {
        self.keys.get(&code)?.as_ref()
    }

    /// Whether a key code has an entry at all (bound or suppressed).
    pub fn has_key_entry(&self, code: u16) -> bool {
        self.keys.contains_key(&code)
    }

    /// The action bound to whatever produced `trigger`.
    pub fn lookup(&self, trigger: &Trigger) -> Option<&Action> {
        match trigger {
            Trigger::Mouse(gesture) => self.mouse_action(*gesture),
            Trigger::Key(code) => self.key_action(*code),
        }
    }
}

/// Run the action mapped to `event` on `node`.
///
/// Returns `true` when an action ran. Suppressed and unmapped slots do
/// nothing.
pub fn dispatch(
    mapping: &ActionMapping,
    model: &mut TreeModel,
    node: NodeId,
    event: &InputEvent,
    extra: Option<&ActionExtra>,
) -> bool {
    match mapping.lookup(&event.trigger) {
        Some(action) => {
            trace!("Dispatching {:?} for {:?} on {:?}", action, event.trigger, node);
            action.run(model, node, event, extra);
            true
        }
        None => {
            trace!("No action for {:?}", event.trigger);
            false
        }
    }
}

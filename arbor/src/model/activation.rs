use crate::events::TreeEvent;
use crate::node::NodeId;

use super::TreeModel;

impl TreeModel {
    // -------------------------------------------------------------------------
    // Activation
    // -------------------------------------------------------------------------

    /// Flip a node's activation.
    ///
    /// Without `multi`, activating a node deactivates every other active
    /// node first. Deactivation never cascades.
    pub fn toggle_activated(&mut self, id: NodeId, multi: bool) -> bool {
        if !self.contains(id) {
            return false;
        }
        let (added, removed) = self.active.toggle(id, multi);
        self.emit_activation(&added, &removed);
        true
    }

    pub fn set_is_active(&mut self, id: NodeId, value: bool, multi: bool) -> bool {
        if !self.contains(id) {
            return false;
        }
        if value {
            let (added, removed) = self.active.select(id, multi);
            let added = if added { vec![id] } else { Vec::new() };
            self.emit_activation(&added, &removed);
            !added.is_empty() || !removed.is_empty()
        } else if self.active.deselect(&id) {
            self.emit(TreeEvent::Deactivated { node: id });
            true
        } else {
            false
        }
    }

    /// Active nodes in tree order.
    pub fn active_nodes(&self) -> Vec<NodeId> {
        self.preorder(None)
            .into_iter()
            .filter(|id| self.active.is_selected(id))
            .collect()
    }

    fn emit_activation(&mut self, added: &[NodeId], removed: &[NodeId]) {
        for node in removed {
            self.emit(TreeEvent::Deactivated { node: *node });
        }
        for node in added {
            self.emit(TreeEvent::Activated { node: *node });
        }
    }

    // -------------------------------------------------------------------------
    // Focus
    // -------------------------------------------------------------------------

    /// Make a node the single focused node. Focusing a node also gives the
    /// tree input focus.
    pub fn focus_node(&mut self, id: NodeId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.has_focus = true;
        if self.focused == Some(id) {
            return false;
        }
        if let Some(previous) = self.focused.take() {
            self.emit(TreeEvent::Blurred { node: previous });
        }
        self.focused = Some(id);
        self.emit(TreeEvent::Focused { node: id });
        true
    }

    /// Drop focus if `id` holds it.
    pub fn blur_node(&mut self, id: NodeId) -> bool {
        if self.focused != Some(id) {
            return false;
        }
        self.focused = None;
        self.emit(TreeEvent::Blurred { node: id });
        true
    }

    pub fn focused_node(&self) -> Option<NodeId> {
        self.focused.filter(|id| self.contains(*id))
    }

    /// Whether the tree itself has input focus.
    pub fn is_focused(&self) -> bool {
        self.has_focus
    }

    pub fn set_focus(&mut self, value: bool) {
        self.has_focus = value;
    }

    /// Focus the next visible node, or the first visible root when nothing
    /// is focused.
    pub fn focus_next_node(&mut self) -> bool {
        let next = match self.focused_node().and_then(|id| self.node(id)) {
            Some(node) => node.find_next_node(true).map(|n| n.id()),
            None => self.get_first_root(true),
        };
        next.is_some_and(|id| self.focus_node(id))
    }

    /// Focus the previous visible node, or the last visible root when
    /// nothing is focused.
    pub fn focus_previous_node(&mut self) -> bool {
        let previous = match self.focused_node().and_then(|id| self.node(id)) {
            Some(node) => node.find_previous_node(true).map(|n| n.id()),
            None => self.get_last_root(true),
        };
        previous.is_some_and(|id| self.focus_node(id))
    }

    /// Focus the first visible child of the focused node if it is expanded.
    pub fn focus_drill_down(&mut self) -> bool {
        let child = self
            .focused_node()
            .and_then(|id| self.node(id))
            .filter(|node| node.is_expanded())
            .and_then(|node| node.get_first_child(true))
            .map(|n| n.id());
        child.is_some_and(|id| self.focus_node(id))
    }

    /// Focus the parent of the focused node.
    pub fn focus_drill_up(&mut self) -> bool {
        let parent = self
            .focused_node()
            .and_then(|id| self.node(id))
            .and_then(|node| node.parent_id());
        parent.is_some_and(|id| self.focus_node(id))
    }
}

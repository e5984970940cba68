use std::sync::Arc;

use crate::events::TreeEvent;
use crate::field::ItemId;
use crate::node::NodeId;

use super::TreeModel;

impl TreeModel {
    /// Expand a node. No-op for leaves and already-expanded nodes.
    ///
    /// Expanding a node whose children are unresolved (or whose last load
    /// failed) requests them from the configured loader.
    pub fn expand(&mut self, id: NodeId) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        if !node.has_children() || node.is_expanded() {
            return false;
        }
        self.write_expanded(id, true);
        self.emit(TreeEvent::Expanded { node: id });
        self.request_children(id);
        true
    }

    /// Collapse a node. No-op for leaves and already-collapsed nodes.
    pub fn collapse(&mut self, id: NodeId) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        if !node.has_children() || node.is_collapsed() {
            return false;
        }
        self.write_expanded(id, false);
        self.emit(TreeEvent::Collapsed { node: id });
        true
    }

    pub fn toggle_expanded(&mut self, id: NodeId) -> bool {
        match self.node(id) {
            Some(node) if node.is_expanded() => self.collapse(id),
            Some(_) => self.expand(id),
            None => false,
        }
    }

    pub fn set_is_expanded(&mut self, id: NodeId, value: bool) -> bool {
        if value { self.expand(id) } else { self.collapse(id) }
    }

    /// Expand every node, including children that resolve synchronously
    /// while expanding.
    pub fn expand_all(&mut self) {
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            self.expand(id);
            if let Some(node) = self.node(id) {
                stack.extend(node.child_ids().iter().rev().copied());
            }
        }
    }

    pub fn collapse_all(&mut self) {
        self.do_for_all(None, |model, id| {
            model.collapse(id);
        });
    }

    /// Expand every collapsed ancestor of a node.
    pub fn ensure_visible(&mut self, id: NodeId) -> bool {
        let mut changed = false;
        let mut current = self.node(id).and_then(|n| n.parent_id());
        while let Some(ancestor) = current {
            changed |= self.expand(ancestor);
            current = self.node(ancestor).and_then(|n| n.parent_id());
        }
        changed
    }

    /// Item ids currently remembered as expanded.
    pub fn expanded_node_ids(&self) -> impl Iterator<Item = &ItemId> {
        self.expanded_ids.iter()
    }

    fn write_expanded(&mut self, id: NodeId, value: bool) {
        let field = Arc::clone(&self.options.is_expanded_field);
        let Some(slot) = self.nodes.get_mut(id) else {
            return;
        };
        field.set_flag(&mut slot.data, value);
        if value {
            self.expanded_ids.insert(slot.item_id.clone());
        } else {
            self.expanded_ids.remove(&slot.item_id);
        }
    }
}

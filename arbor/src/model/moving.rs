//! Drag-and-drop reparenting.

use std::sync::Arc;

use log::debug;

use crate::children::ChildrenState;
use crate::events::TreeEvent;
use crate::input::InputEvent;
use crate::node::NodeId;

use super::TreeModel;

/// Where a dragged node should land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropTarget {
    /// New parent, `None` for the root list.
    pub parent: Option<NodeId>,
    /// Drop slot among the parent's children, counted before the moved
    /// node is detached.
    pub index: usize,
    /// The drop happened on the parent's row rather than between rows.
    pub drop_on_node: bool,
}

impl DropTarget {
    pub fn new(parent: Option<NodeId>, index: usize) -> Self {
        Self {
            parent,
            index,
            drop_on_node: false,
        }
    }

    /// Slot `index` in the root list.
    pub fn root(index: usize) -> Self {
        Self::new(None, index)
    }

    /// Slot `index` under `parent`.
    pub fn child_of(parent: NodeId, index: usize) -> Self {
        Self::new(Some(parent), index)
    }

    /// Dropped on `parent`'s row: becomes its first child.
    pub fn onto(parent: NodeId) -> Self {
        Self {
            parent: Some(parent),
            index: 0,
            drop_on_node: true,
        }
    }
}

impl TreeModel {
    /// Relink `id` under `to.parent` at drop slot `to.index`.
    ///
    /// Rejected moves (a target inside the moved subtree, a refusing
    /// `allow_drop`, a parent still loading, or a drop back into the node's
    /// own slot) change nothing and return `false`.
    pub fn move_node(&mut self, id: NodeId, to: DropTarget) -> bool {
        self.move_node_with_event(id, to, None)
    }

    /// Like [`TreeModel::move_node`], passing the triggering input event to
    /// the `allow_drop` predicate.
    pub fn move_node_with_event(
        &mut self,
        id: NodeId,
        to: DropTarget,
        event: Option<&InputEvent>,
    ) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        let from = DropTarget::new(node.parent_id(), node.index());

        if let Some(parent) = to.parent {
            let Some(target) = self.node(parent) else {
                debug!("Rejected move of {}: target parent is gone", id);
                return false;
            };
            if parent == id || target.is_descendant_of(id) {
                debug!("Rejected move of {}: target is inside the moved subtree", id);
                return false;
            }
            if target.is_loading() {
                debug!("Rejected move of {}: target children are still loading", id);
                return false;
            }
        }

        let options = Arc::clone(&self.options);
        if !(options.allow_drop)(node.data(), &to, event) {
            debug!("Rejected move of {}: drop not allowed", id);
            return false;
        }

        let mut index = to.index;
        if from.parent == to.parent {
            if index == from.index || index == from.index + 1 {
                return false;
            }
            if index > from.index {
                index -= 1;
            }
        }

        if let Some(siblings) = self.sibling_list_mut(from.parent) {
            siblings.retain(|sibling| *sibling != id);
        }
        self.reindex(from.parent);

        if let Some(parent) = to.parent {
            let resolved = self
                .nodes
                .get(parent)
                .is_some_and(|slot| slot.children.is_loaded());
            if !resolved {
                self.set_loaded(parent, Vec::new());
            }
        }
        let Some(siblings) = self.sibling_list_mut(to.parent) else {
            return false;
        };
        let index = index.min(siblings.len());
        siblings.insert(index, id);
        self.reindex(to.parent);

        if let Some(slot) = self.nodes.get_mut(id) {
            slot.parent = to.parent;
        }
        self.relevel(id);

        let to = DropTarget { index, ..to };
        debug!("Moved {} from {:?} to {:?}", id, from, to);
        self.emit(TreeEvent::Moved { node: id, from, to });
        true
    }

    /// Whether a drag may start on a node.
    pub fn can_drag(&self, id: NodeId) -> bool {
        self.options.enable_drag_and_drop && self.node(id).is_some_and(|node| node.allow_drag())
    }

    fn sibling_list_mut(&mut self, parent: Option<NodeId>) -> Option<&mut Vec<NodeId>> {
        match parent {
            None => Some(&mut self.roots),
            Some(parent) => match &mut self.nodes.get_mut(parent)?.children {
                ChildrenState::Loaded(children) => Some(children),
                _ => None,
            },
        }
    }

    fn reindex(&mut self, parent: Option<NodeId>) {
        let siblings = match parent {
            None => self.roots.clone(),
            Some(parent) => match self.nodes.get(parent) {
                Some(slot) => slot.children.ids().to_vec(),
                None => return,
            },
        };
        for (index, sibling) in siblings.into_iter().enumerate() {
            if let Some(slot) = self.nodes.get_mut(sibling) {
                slot.index = index;
            }
        }
    }

    /// Recompute levels for a node and its subtree after relinking.
    fn relevel(&mut self, id: NodeId) {
        for node in self.preorder(Some(id)) {
            let parent_level = self
                .nodes
                .get(node)
                .and_then(|slot| slot.parent)
                .and_then(|parent| self.nodes.get(parent))
                .map_or(0, |slot| slot.level);
            if let Some(slot) = self.nodes.get_mut(node) {
                slot.level = parent_level + 1;
            }
        }
    }
}

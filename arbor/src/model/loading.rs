//! Lazy and asynchronous children.
//!
//! Nodes with unresolved children ask the configured loader when they are
//! expanded. Ready results are spliced in immediately; pending ones are
//! queued as [`ChildrenLoad`]s for the host to drive, and come back through
//! [`TreeModel::complete_load`]. A node never has more than one load in
//! flight, and results for nodes that were since dropped or reloaded are
//! ignored.

use std::sync::Arc;

use log::{debug, warn};

use crate::children::{ChildrenLoad, ChildrenSource, ChildrenState, LoadCompletion, LoadTicket};
use crate::events::TreeEvent;
use crate::field::RawItem;
use crate::node::NodeId;

use super::TreeModel;

impl TreeModel {
    /// Ask the loader for a node's children if they are not resolved and
    /// no load is in flight. Returns whether a load was started.
    pub fn request_children(&mut self, id: NodeId) -> bool {
        let options = Arc::clone(&self.options);
        let Some(loader) = options.get_children.as_ref() else {
            return false;
        };
        let Some(node) = self.node(id) else {
            return false;
        };
        if matches!(
            node.children_state(),
            ChildrenState::Loaded(_) | ChildrenState::Loading { .. }
        ) {
            return false;
        }

        let source = loader(&node);
        match source {
            ChildrenSource::Ready(items) => {
                self.splice_children(id, items);
            }
            ChildrenSource::Pending(future) => {
                let serial = self.next_serial;
                self.next_serial += 1;
                if let Some(slot) = self.nodes.get_mut(id) {
                    slot.children = ChildrenState::Loading { serial };
                }
                debug!("Loading children for {} (load {})", id, serial);
                self.pending
                    .push(ChildrenLoad::new(LoadTicket { node: id, serial }, future));
            }
        }
        true
    }

    /// Hand all queued loads to the caller.
    pub fn take_pending_loads(&mut self) -> Vec<ChildrenLoad> {
        std::mem::take(&mut self.pending)
    }

    pub fn has_pending_loads(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Apply a finished load. Returns `false` if it was stale.
    pub fn complete_load(&mut self, completion: LoadCompletion) -> bool {
        let LoadCompletion { ticket, result } = completion;
        let current = matches!(
            self.nodes.get(ticket.node).map(|slot| &slot.children),
            Some(ChildrenState::Loading { serial }) if *serial == ticket.serial
        );
        if !current {
            debug!("Ignoring stale load {} for {}", ticket.serial, ticket.node);
            return false;
        }

        match result {
            Ok(items) => {
                debug!("Loaded {} children for {}", items.len(), ticket.node);
                self.splice_children(ticket.node, items);
            }
            Err(error) => {
                warn!("Failed to load children for {}: {}", ticket.node, error);
                if let Some(slot) = self.nodes.get_mut(ticket.node) {
                    slot.children = ChildrenState::Failed(error.clone());
                }
                self.emit(TreeEvent::LoadFailed {
                    node: ticket.node,
                    error,
                });
            }
        }
        true
    }

    fn splice_children(&mut self, id: NodeId, items: Vec<RawItem>) {
        let Some(level) = self.nodes.get(id).map(|slot| slot.level + 1) else {
            return;
        };
        let children = self.build_children(items, Some(id), level);
        self.set_loaded(id, children.clone());

        if let Some(filter) = self.filter.clone() {
            self.apply_filter(&filter, false);
        }

        let added: Vec<NodeId> = children
            .iter()
            .flat_map(|child| self.preorder(Some(*child)))
            .collect();
        self.emit(TreeEvent::ChildrenLoaded { node: id });
        self.request_expanded_loads(&added);
    }

    /// Start loads for expanded nodes whose children are still unloaded.
    pub(crate) fn request_expanded_loads(&mut self, nodes: &[NodeId]) {
        if self.options.get_children.is_none() {
            return;
        }
        for id in nodes {
            let wants_load = self.node(*id).is_some_and(|node| {
                node.is_expanded() && matches!(node.children_state(), ChildrenState::Unloaded)
            });
            if wants_load {
                self.request_children(*id);
            }
        }
    }
}

//! The tree model: node forest plus tree-wide state.
//!
//! Split by concern:
//! - `expansion`: expand/collapse and ensure-visible
//! - `activation`: active set and focus, keyboard focus navigation
//! - `filter`: hidden flags and text/predicate filtering
//! - `moving`: drag-and-drop reparenting
//! - `loading`: lazy and asynchronous children

mod activation;
mod expansion;
mod filter;
mod loading;
mod moving;

pub use filter::NodeFilter;
pub use moving::DropTarget;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use log::debug;
use serde_json::Value;
use slotmap::SlotMap;

use crate::actions::{self, ActionExtra};
use crate::children::{ChildrenLoad, ChildrenState};
use crate::events::TreeEvent;
use crate::field::{ItemId, RawItem, is_truthy};
use crate::input::InputEvent;
use crate::node::{NodeId, NodeRef, NodeSlot};
use crate::options::{ResolvedOptions, TreeOptions};
use crate::selection::Selection;

/// Owns the node forest and all tree-wide state.
#[derive(Debug)]
pub struct TreeModel {
    pub(crate) options: Arc<ResolvedOptions>,
    pub(crate) nodes: SlotMap<NodeId, NodeSlot>,
    pub(crate) roots: Vec<NodeId>,
    pub(crate) focused: Option<NodeId>,
    pub(crate) active: Selection<NodeId>,
    pub(crate) expanded_ids: HashSet<ItemId>,
    pub(crate) filter: Option<NodeFilter>,
    pub(crate) has_focus: bool,
    pub(crate) events: Vec<TreeEvent>,
    pub(crate) pending: Vec<ChildrenLoad>,
    pub(crate) next_serial: u64,
}

impl TreeModel {
    /// Build a model from root items and sparse options.
    pub fn new(roots: Vec<RawItem>, options: TreeOptions) -> Self {
        Self::with_options(roots, Arc::new(options.resolve()))
    }

    /// Build a model sharing already-resolved options.
    pub fn with_options(roots: Vec<RawItem>, options: Arc<ResolvedOptions>) -> Self {
        let mut model = Self {
            options,
            nodes: SlotMap::with_key(),
            roots: Vec::new(),
            focused: None,
            active: Selection::new(),
            expanded_ids: HashSet::new(),
            filter: None,
            has_focus: false,
            events: Vec::new(),
            pending: Vec::new(),
            next_serial: 0,
        };
        model.rebuild(roots);
        model
    }

    pub fn options(&self) -> &Arc<ResolvedOptions> {
        &self.options
    }

    // -------------------------------------------------------------------------
    // Building
    // -------------------------------------------------------------------------

    /// Replace the whole forest.
    ///
    /// Expansion is restored from the remembered expanded ids, and the active
    /// and focused nodes are carried over by item id. Every previous
    /// [`NodeId`] becomes stale.
    pub fn set_data(&mut self, roots: Vec<RawItem>) {
        let active_ids: Vec<ItemId> = self
            .active
            .iter()
            .filter_map(|id| self.nodes.get(*id).map(|slot| slot.item_id.clone()))
            .collect();
        let focused_id = self
            .focused
            .and_then(|id| self.nodes.get(id).map(|slot| slot.item_id.clone()));

        self.rebuild(roots);

        let by_item: HashMap<ItemId, NodeId> = self
            .preorder(None)
            .into_iter()
            .filter_map(|id| self.nodes.get(id).map(|slot| (slot.item_id.clone(), id)))
            .collect();
        for item_id in active_ids {
            if let Some(id) = by_item.get(&item_id) {
                self.active.select(*id, true);
            }
        }
        self.focused = focused_id.and_then(|item_id| by_item.get(&item_id).copied());

        self.events.push(TreeEvent::Updated);
    }

    /// Rebuild from the current data, picking up external edits to
    /// children fields made through [`TreeModel::data_mut`].
    pub fn update(&mut self) {
        let data = self.export_data();
        self.set_data(data);
    }

    fn rebuild(&mut self, roots: Vec<RawItem>) {
        self.nodes.clear();
        self.active.clear();
        self.focused = None;
        self.pending.clear();
        self.roots = self.build_children(roots, None, 1);

        let present: HashSet<&ItemId> = self.nodes.values().map(|slot| &slot.item_id).collect();
        self.expanded_ids.retain(|item_id| present.contains(item_id));

        let nodes = self.preorder(None);
        if let Some(filter) = self.filter.clone() {
            self.apply_filter(&filter, false);
        }
        self.request_expanded_loads(&nodes);

        debug!(
            "Built tree: {} roots, {} nodes",
            self.roots.len(),
            self.nodes.len()
        );
    }

    pub(crate) fn build_children(
        &mut self,
        items: Vec<RawItem>,
        parent: Option<NodeId>,
        level: usize,
    ) -> Vec<NodeId> {
        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| self.build_node(item, parent, index, level))
            .collect()
    }

    fn build_node(
        &mut self,
        mut data: RawItem,
        parent: Option<NodeId>,
        index: usize,
        level: usize,
    ) -> NodeId {
        let options = Arc::clone(&self.options);
        let raw_children = options.children_field.take(&mut data);

        let item_id = match options.id_field.get(&data).and_then(ItemId::from_value) {
            Some(id) => id,
            None => {
                let id = ItemId::generate();
                options
                    .id_field
                    .set(&mut data, Value::String(id.as_str().to_owned()));
                id
            }
        };

        match options.is_expanded_field.get(&data) {
            Some(flag) if is_truthy(flag) => {
                self.expanded_ids.insert(item_id.clone());
            }
            Some(_) => {
                self.expanded_ids.remove(&item_id);
            }
            None => {
                if self.expanded_ids.contains(&item_id) {
                    options.is_expanded_field.set_flag(&mut data, true);
                }
            }
        }

        let id = self.nodes.insert(NodeSlot {
            data,
            item_id,
            parent,
            children: ChildrenState::Unloaded,
            index,
            level,
        });

        match raw_children {
            Some(Value::Array(items)) => {
                let children = self.build_children(items, Some(id), level + 1);
                if let Some(slot) = self.nodes.get_mut(id) {
                    slot.children = ChildrenState::Loaded(children);
                }
            }
            // Anything else (null, a placeholder) means "not loaded yet";
            // keep it on the item so exports round-trip.
            Some(other) => {
                if let Some(slot) = self.nodes.get_mut(id) {
                    options.children_field.set(&mut slot.data, other);
                }
            }
            None => {}
        }
        id
    }

    /// Reassemble the nested item structure, including moves and loaded
    /// children. Children fields set on an item externally take precedence.
    pub fn export_data(&self) -> Vec<RawItem> {
        self.roots
            .iter()
            .filter_map(|id| self.export_node(*id))
            .collect()
    }

    /// Mark children resolved, dropping any placeholder children field.
    pub(crate) fn set_loaded(&mut self, id: NodeId, children: Vec<NodeId>) {
        let field = Arc::clone(&self.options.children_field);
        if let Some(slot) = self.nodes.get_mut(id) {
            field.take(&mut slot.data);
            slot.children = ChildrenState::Loaded(children);
        }
    }

    fn export_node(&self, id: NodeId) -> Option<RawItem> {
        let slot = self.nodes.get(id)?;
        let mut data = slot.data.clone();
        let field = &self.options.children_field;
        if field.get(&data).is_none() {
            if let ChildrenState::Loaded(children) = &slot.children {
                let items = children
                    .iter()
                    .filter_map(|child| self.export_node(*child))
                    .collect();
                field.set(&mut data, Value::Array(items));
            }
        }
        Some(data)
    }

    // -------------------------------------------------------------------------
    // Access
    // -------------------------------------------------------------------------

    /// Read view of a node. `None` for stale ids.
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        NodeRef::new(self, id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty_tree(&self) -> bool {
        self.roots.is_empty()
    }

    /// The backing item of a node.
    pub fn data(&self, id: NodeId) -> Option<&RawItem> {
        self.nodes.get(id).map(|slot| &slot.data)
    }

    /// Mutable access to the backing item. Flag changes are observed
    /// immediately; children field edits take effect on [`TreeModel::update`].
    pub fn data_mut(&mut self, id: NodeId) -> Option<&mut RawItem> {
        self.nodes.get_mut(id).map(|slot| &mut slot.data)
    }

    pub fn get_visible_roots(&self) -> Vec<NodeId> {
        self.roots
            .iter()
            .copied()
            .filter(|id| self.node(*id).is_some_and(|n| !n.is_hidden()))
            .collect()
    }

    pub fn get_first_root(&self, skip_hidden: bool) -> Option<NodeId> {
        self.roots
            .iter()
            .copied()
            .find(|id| !skip_hidden || self.node(*id).is_some_and(|n| !n.is_hidden()))
    }

    pub fn get_last_root(&self, skip_hidden: bool) -> Option<NodeId> {
        self.roots
            .iter()
            .rev()
            .copied()
            .find(|id| !skip_hidden || self.node(*id).is_some_and(|n| !n.is_hidden()))
    }

    /// Everything a user would see scrolling top to bottom: visible nodes
    /// whose ancestors are all expanded, in display order.
    pub fn visible_sequence(&self) -> Vec<NodeId> {
        let mut sequence = Vec::new();
        let mut current = self.get_first_root(true).and_then(|id| self.node(id));
        while let Some(node) = current {
            sequence.push(node.id());
            current = node.find_next_node(true);
        }
        sequence
    }

    /// Ids of every node below `start` (or the whole forest), pre-order.
    /// `start` itself is included.
    pub fn preorder(&self, start: Option<NodeId>) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = match start {
            Some(id) => vec![id],
            None => self.roots.iter().rev().copied().collect(),
        };
        while let Some(id) = stack.pop() {
            let Some(slot) = self.nodes.get(id) else {
                continue;
            };
            out.push(id);
            stack.extend(slot.children.ids().iter().rev().copied());
        }
        out
    }

    /// Apply `f` to `start` and all its loaded descendants (or to the whole
    /// forest), pre-order.
    pub fn do_for_all(
        &mut self,
        start: Option<NodeId>,
        mut f: impl FnMut(&mut TreeModel, NodeId),
    ) {
        for id in self.preorder(start) {
            if self.nodes.contains_key(id) {
                f(self, id);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Lookup
    // -------------------------------------------------------------------------

    /// Walk `path` one id per level, starting from the children of `start`
    /// (or the roots). An empty path yields `start`.
    pub fn get_node_by_path(&self, path: &[ItemId], start: Option<NodeId>) -> Option<NodeId> {
        let mut current = start;
        for item_id in path {
            let candidates: &[NodeId] = match current {
                Some(id) => self.nodes.get(id)?.children.ids(),
                None => &self.roots,
            };
            current = Some(
                candidates
                    .iter()
                    .copied()
                    .find(|id| self.nodes.get(*id).is_some_and(|s| &s.item_id == item_id))?,
            );
        }
        current
    }

    pub fn get_node_by_id(&self, item_id: &str) -> Option<NodeId> {
        self.get_node_by(|node| node.item_id() == item_id, None)
    }

    /// First node below `start` (or in the whole forest) matching
    /// `predicate`, pre-order. `start` itself is not considered.
    pub fn get_node_by(
        &self,
        predicate: impl Fn(&NodeRef<'_>) -> bool,
        start: Option<NodeId>,
    ) -> Option<NodeId> {
        self.preorder(start)
            .into_iter()
            .filter(|id| Some(*id) != start)
            .find(|id| self.node(*id).is_some_and(|n| predicate(&n)))
    }

    // -------------------------------------------------------------------------
    // Events and input
    // -------------------------------------------------------------------------

    /// Take all events raised since the last drain.
    pub fn drain_events(&mut self) -> Vec<TreeEvent> {
        std::mem::take(&mut self.events)
    }

    /// Dispatch a raw input event on `node` through the resolved mapping.
    pub fn handle_input(
        &mut self,
        node: NodeId,
        event: &InputEvent,
        extra: Option<&ActionExtra>,
    ) -> bool {
        let options = Arc::clone(&self.options);
        actions::dispatch(&options.action_mapping, self, node, event, extra)
    }

    pub(crate) fn emit(&mut self, event: TreeEvent) {
        self.events.push(event);
    }
}

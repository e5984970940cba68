//! Node identity and the read-only node view.

use std::fmt;

use slotmap::Key;

use crate::children::ChildrenState;
use crate::field::{ItemId, RawItem, is_truthy};
use crate::layout;
use crate::model::TreeModel;

slotmap::new_key_type! {
    /// Handle to a node in a [`TreeModel`].
    ///
    /// Keys are versioned: once a node is dropped (for example by a data
    /// rebuild) its id never resolves again, even if the slot is reused.
    pub struct NodeId;
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:?}", self.data())
    }
}

/// Storage for one node. Parents own their children through
/// `ChildrenState::Loaded`; the back-reference to the parent is a plain id.
#[derive(Debug)]
pub(crate) struct NodeSlot {
    /// Backing item, with its children field detached.
    pub data: RawItem,
    /// Id read from (or generated into) the item's id field.
    pub item_id: ItemId,
    pub parent: Option<NodeId>,
    pub children: ChildrenState,
    /// Position among siblings.
    pub index: usize,
    /// Depth, roots are level 1.
    pub level: usize,
}

/// Borrowed view of one node.
///
/// All derived state (level, path, flags, traversal) is read through here.
/// Mutation goes through [`TreeModel`] by [`NodeId`].
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    model: &'a TreeModel,
    id: NodeId,
    slot: &'a NodeSlot,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(model: &'a TreeModel, id: NodeId) -> Option<Self> {
        let slot = model.nodes.get(id)?;
        Some(Self { model, id, slot })
    }

    fn at(&self, id: NodeId) -> Option<NodeRef<'a>> {
        NodeRef::new(self.model, id)
    }

    // -------------------------------------------------------------------------
    // Identity
    // -------------------------------------------------------------------------

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Id read from the item's id field.
    pub fn item_id(&self) -> &'a ItemId {
        &self.slot.item_id
    }

    /// The backing item. The children field is not part of it; use
    /// `TreeModel::export_data` for the reassembled structure.
    pub fn data(&self) -> &'a RawItem {
        &self.slot.data
    }

    pub fn model(&self) -> &'a TreeModel {
        self.model
    }

    /// Position among siblings.
    pub fn index(&self) -> usize {
        self.slot.index
    }

    /// Depth. Roots are level 1.
    pub fn level(&self) -> usize {
        self.slot.level
    }

    /// Item ids from the root down to and including this node.
    pub fn path(&self) -> Vec<ItemId> {
        let mut path = vec![self.slot.item_id.clone()];
        let mut current = self.parent();
        while let Some(node) = current {
            path.push(node.slot.item_id.clone());
            current = node.parent();
        }
        path.reverse();
        path
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.at(self.slot.parent?)
    }

    pub fn parent_id(&self) -> Option<NodeId> {
        self.slot.parent
    }

    pub fn children_state(&self) -> &'a ChildrenState {
        &self.slot.children
    }

    /// Resolved child ids. Empty while unresolved.
    pub fn child_ids(&self) -> &'a [NodeId] {
        self.slot.children.ids()
    }

    pub fn children(self) -> impl Iterator<Item = NodeRef<'a>> {
        let model = self.model;
        self.child_ids()
            .iter()
            .filter_map(move |id| NodeRef::new(model, *id))
    }

    /// Ids of this node and its siblings, in order.
    pub fn sibling_ids(&self) -> &'a [NodeId] {
        match self.slot.parent {
            Some(parent) => self
                .model
                .nodes
                .get(parent)
                .map(|slot| slot.children.ids())
                .unwrap_or(&[]),
            None => &self.model.roots,
        }
    }

    // -------------------------------------------------------------------------
    // Flags
    // -------------------------------------------------------------------------

    pub fn is_expanded(&self) -> bool {
        self.model.options.is_expanded_field.get_flag(&self.slot.data)
    }

    pub fn is_collapsed(&self) -> bool {
        !self.is_expanded()
    }

    pub fn is_hidden(&self) -> bool {
        self.model.options.is_hidden_field.get_flag(&self.slot.data)
    }

    pub fn is_active(&self) -> bool {
        self.model.active.is_selected(&self.id)
    }

    /// Whether this node holds focus. Requires the tree itself to be focused.
    pub fn is_focused(&self) -> bool {
        self.model.has_focus && self.model.focused == Some(self.id)
    }

    /// Resolved children decide; until then the has-children flag does.
    pub fn has_children(&self) -> bool {
        match &self.slot.children {
            ChildrenState::Loaded(ids) => !ids.is_empty(),
            _ => self.model.options.has_children_field.get_flag(&self.slot.data),
        }
    }

    pub fn is_leaf(&self) -> bool {
        !self.has_children()
    }

    pub fn is_root(&self) -> bool {
        self.slot.parent.is_none()
    }

    pub fn is_loading(&self) -> bool {
        self.slot.children.is_loading()
    }

    /// Zero-height placeholder rows carry a truthy `virtual` field.
    pub fn is_virtual(&self) -> bool {
        self.slot
            .data
            .get(layout::VIRTUAL_FIELD)
            .is_some_and(is_truthy)
    }

    pub fn is_descendant_of(&self, ancestor: NodeId) -> bool {
        let mut current = self.slot.parent;
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.model.nodes.get(id).and_then(|slot| slot.parent);
        }
        false
    }

    // -------------------------------------------------------------------------
    // Display
    // -------------------------------------------------------------------------

    /// Display text from the display field, if present.
    pub fn display_field(&self) -> Option<String> {
        self.model.options.display_field.get_text(&self.slot.data)
    }

    /// Left padding for this node's row.
    pub fn get_node_padding(&self) -> u32 {
        layout::node_padding(&self.model.options, self.slot.level)
    }

    /// Host-computed class for this node's row.
    pub fn get_class(&self) -> String {
        (self.model.options.node_class)(self)
    }

    /// Row height, drop slot included.
    pub fn height(&self) -> u32 {
        layout::node_height(&self.model.options, self)
    }

    pub fn allow_drag(&self) -> bool {
        (self.model.options.allow_drag)(self)
    }

    // -------------------------------------------------------------------------
    // Traversal
    // -------------------------------------------------------------------------

    pub fn find_next_sibling(&self, skip_hidden: bool) -> Option<NodeRef<'a>> {
        self.sibling_ids()
            .get(self.slot.index + 1..)?
            .iter()
            .filter_map(|id| self.at(*id))
            .find(|node| !skip_hidden || !node.is_hidden())
    }

    pub fn find_previous_sibling(&self, skip_hidden: bool) -> Option<NodeRef<'a>> {
        self.sibling_ids()
            .get(..self.slot.index)?
            .iter()
            .rev()
            .filter_map(|id| self.at(*id))
            .find(|node| !skip_hidden || !node.is_hidden())
    }

    pub fn get_first_child(&self, skip_hidden: bool) -> Option<NodeRef<'a>> {
        self.children().find(|node| !skip_hidden || !node.is_hidden())
    }

    pub fn get_last_child(&self, skip_hidden: bool) -> Option<NodeRef<'a>> {
        let model = self.model;
        self.child_ids()
            .iter()
            .rev()
            .filter_map(|id| NodeRef::new(model, *id))
            .find(|node| !skip_hidden || !node.is_hidden())
    }

    /// Next node in visible order.
    ///
    /// With `go_inside` an expanded node yields its first visible child;
    /// otherwise the search continues with the next visible sibling, then
    /// the next sibling of the nearest ancestor that has one. Hidden nodes
    /// are always skipped.
    pub fn find_next_node(&self, go_inside: bool) -> Option<NodeRef<'a>> {
        if go_inside && self.is_expanded() {
            if let Some(child) = self.get_first_child(true) {
                return Some(child);
            }
        }
        let mut current = *self;
        loop {
            if let Some(sibling) = current.find_next_sibling(true) {
                return Some(sibling);
            }
            current = current.parent()?;
        }
    }

    /// Previous node in visible order: the deepest last open descendant of
    /// the previous sibling, or the parent when there is no previous sibling.
    pub fn find_previous_node(&self, skip_hidden: bool) -> Option<NodeRef<'a>> {
        match self.find_previous_sibling(skip_hidden) {
            Some(sibling) => Some(sibling.last_open_descendant(skip_hidden)),
            None => self.parent(),
        }
    }

    fn last_open_descendant(self, skip_hidden: bool) -> NodeRef<'a> {
        let mut node = self;
        while node.is_expanded() {
            match node.get_last_child(skip_hidden) {
                Some(child) => node = child,
                None => break,
            }
        }
        node
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("item_id", &self.slot.item_id)
            .field("level", &self.slot.level)
            .field("index", &self.slot.index)
            .finish()
    }
}

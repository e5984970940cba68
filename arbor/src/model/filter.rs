//! Hidden flags and filtering.
//!
//! Filtering only flags nodes hidden; nothing is removed, so hidden nodes
//! stay addressable by id and path and reappear on `clear_filter`.

use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::node::{NodeId, NodeRef};

use super::TreeModel;

/// Predicate deciding whether a node matches a filter.
pub type FilterFn = Arc<dyn Fn(&NodeRef<'_>) -> bool + Send + Sync>;

/// A node filter.
#[derive(Clone)]
pub enum NodeFilter {
    /// Case-insensitive substring match against the display field.
    Text(String),
    Predicate(FilterFn),
}

impl NodeFilter {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&NodeRef<'_>) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(f))
    }

    pub fn matches(&self, node: &NodeRef<'_>) -> bool {
        match self {
            NodeFilter::Text(text) => {
                let needle = text.to_lowercase();
                node.display_field()
                    .is_some_and(|display| display.to_lowercase().contains(&needle))
            }
            NodeFilter::Predicate(f) => f(node),
        }
    }

    fn is_blank(&self) -> bool {
        matches!(self, NodeFilter::Text(text) if text.trim().is_empty())
    }
}

impl fmt::Debug for NodeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeFilter::Text(text) => f.debug_tuple("Text").field(text).finish(),
            NodeFilter::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl From<&str> for NodeFilter {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl From<String> for NodeFilter {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl TreeModel {
    pub fn set_is_hidden(&mut self, id: NodeId, value: bool) -> bool {
        if value { self.hide(id) } else { self.show(id) }
    }

    /// Hide a single node. Descendants keep their own flags.
    pub fn hide(&mut self, id: NodeId) -> bool {
        self.write_hidden(id, true)
    }

    /// Show a node and every ancestor, since a node under a hidden
    /// ancestor cannot be displayed.
    pub fn show(&mut self, id: NodeId) -> bool {
        let mut changed = false;
        let mut current = Some(id);
        while let Some(node) = current {
            changed |= self.write_hidden(node, false);
            current = self.nodes.get(node).and_then(|slot| slot.parent);
        }
        changed
    }

    /// Hide every node that does not match `filter`, keeping the path to
    /// each match visible. With `auto_show`, collapsed ancestors of visible
    /// nodes are expanded too.
    ///
    /// The filter is remembered and reapplied when children load or the
    /// data is rebuilt. A blank text filter clears filtering instead.
    /// Returns the number of matching nodes.
    pub fn filter_nodes(&mut self, filter: impl Into<NodeFilter>, auto_show: bool) -> usize {
        let filter = filter.into();
        if filter.is_blank() {
            self.clear_filter();
            return 0;
        }
        self.filter = Some(filter.clone());
        self.apply_filter(&filter, auto_show)
    }

    /// Drop the stored filter and show every node.
    pub fn clear_filter(&mut self) {
        self.filter = None;
        for id in self.preorder(None) {
            self.write_hidden(id, false);
        }
        debug!("Cleared filter");
    }

    pub fn current_filter(&self) -> Option<&NodeFilter> {
        self.filter.as_ref()
    }

    pub(crate) fn apply_filter(&mut self, filter: &NodeFilter, auto_show: bool) -> usize {
        let nodes = self.preorder(None);
        let matched: Vec<NodeId> = nodes
            .iter()
            .copied()
            .filter(|id| self.node(*id).is_some_and(|node| filter.matches(&node)))
            .collect();

        for id in &nodes {
            self.write_hidden(*id, true);
        }
        for id in &matched {
            self.show(*id);
        }

        if auto_show {
            for id in &nodes {
                if self.node(*id).is_some_and(|node| !node.is_hidden()) {
                    self.ensure_visible(*id);
                }
            }
        }

        debug!("Filter matched {} of {} nodes", matched.len(), nodes.len());
        matched.len()
    }

    fn write_hidden(&mut self, id: NodeId, value: bool) -> bool {
        let field = Arc::clone(&self.options.is_hidden_field);
        let Some(slot) = self.nodes.get_mut(id) else {
            return false;
        };
        if field.get_flag(&slot.data) == value {
            return false;
        }
        field.set_flag(&mut slot.data, value);
        true
    }
}

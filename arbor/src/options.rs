//! Tree options.
//!
//! [`TreeOptions`] is the sparse, user-facing configuration: every field is
//! optional and can be loaded from JSON. Function-valued options (loaders,
//! predicates, class callbacks) can only be set through the builder.
//! [`TreeOptions::resolve`] turns it into [`ResolvedOptions`], a complete,
//! immutable configuration shared by the model through an `Arc`.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer};

use crate::actions::{ActionMapping, ActionMappingOptions};
use crate::children::{ChildrenLoader, ChildrenSource};
use crate::error::OptionsError;
use crate::field::{self, Field, RawItem};
use crate::input::InputEvent;
use crate::model::DropTarget;
use crate::node::NodeRef;

pub const DEFAULT_CHILDREN_FIELD: &str = "children";
pub const DEFAULT_DISPLAY_FIELD: &str = "name";
pub const DEFAULT_ID_FIELD: &str = "id";
pub const DEFAULT_IS_EXPANDED_FIELD: &str = "isExpanded";
pub const DEFAULT_IS_HIDDEN_FIELD: &str = "isHidden";
pub const DEFAULT_HAS_CHILDREN_FIELD: &str = "hasChildren";
pub const DEFAULT_NODE_HEIGHT: u32 = 22;
pub const DEFAULT_DROP_SLOT_HEIGHT: u32 = 2;
pub const DEFAULT_LEVEL_PADDING: u32 = 0;

/// Base row height for a node, before the drop slot is added.
pub type NodeHeightFn = Arc<dyn Fn(&NodeRef<'_>) -> u32 + Send + Sync>;

/// Whether a node may be dragged.
pub type DragPredicate = Arc<dyn Fn(&NodeRef<'_>) -> bool + Send + Sync>;

/// Whether the dragged item may be dropped at a target.
pub type DropPredicate =
    Arc<dyn Fn(&RawItem, &DropTarget, Option<&InputEvent>) -> bool + Send + Sync>;

/// Extra row class for a node.
pub type NodeClassFn = Arc<dyn Fn(&NodeRef<'_>) -> String + Send + Sync>;

/// Row height configuration: a constant or a per-node function.
#[derive(Clone)]
pub enum NodeHeight {
    Fixed(u32),
    Computed(NodeHeightFn),
}

impl fmt::Debug for NodeHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeHeight::Fixed(h) => f.debug_tuple("Fixed").field(h).finish(),
            NodeHeight::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Only constants can come from JSON.
impl<'de> Deserialize<'de> for NodeHeight {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(NodeHeight::Fixed)
    }
}

/// Sparse tree configuration. Unset fields take defaults at resolve time.
#[derive(Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TreeOptions {
    pub children_field: Option<String>,
    pub display_field: Option<String>,
    pub id_field: Option<String>,
    pub is_expanded_field: Option<String>,
    pub is_hidden_field: Option<String>,
    pub has_children_field: Option<String>,
    pub action_mapping: ActionMappingOptions,
    pub level_padding: Option<u32>,
    pub use_virtual_scroll: Option<bool>,
    pub node_height: Option<NodeHeight>,
    pub enable_drag_and_drop: Option<bool>,
    pub drop_slot_height: Option<u32>,
    #[serde(skip)]
    pub allow_drag: Option<DragPredicate>,
    #[serde(skip)]
    pub allow_drop: Option<DropPredicate>,
    #[serde(skip)]
    pub get_children: Option<ChildrenLoader>,
    #[serde(skip)]
    pub node_class: Option<NodeClassFn>,
}

impl fmt::Debug for TreeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeOptions")
            .field("children_field", &self.children_field)
            .field("display_field", &self.display_field)
            .field("id_field", &self.id_field)
            .field("is_expanded_field", &self.is_expanded_field)
            .field("is_hidden_field", &self.is_hidden_field)
            .field("has_children_field", &self.has_children_field)
            .field("action_mapping", &self.action_mapping)
            .field("level_padding", &self.level_padding)
            .field("use_virtual_scroll", &self.use_virtual_scroll)
            .field("node_height", &self.node_height)
            .field("enable_drag_and_drop", &self.enable_drag_and_drop)
            .field("drop_slot_height", &self.drop_slot_height)
            .field("allow_drag", &self.allow_drag.is_some())
            .field("allow_drop", &self.allow_drop.is_some())
            .field("get_children", &self.get_children.is_some())
            .field("node_class", &self.node_class.is_some())
            .finish()
    }
}

impl TreeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from JSON. Unknown keys are ignored.
    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn children_field(mut self, name: impl Into<String>) -> Self {
        self.children_field = Some(name.into());
        self
    }

    pub fn display_field(mut self, name: impl Into<String>) -> Self {
        self.display_field = Some(name.into());
        self
    }

    pub fn id_field(mut self, name: impl Into<String>) -> Self {
        self.id_field = Some(name.into());
        self
    }

    pub fn is_expanded_field(mut self, name: impl Into<String>) -> Self {
        self.is_expanded_field = Some(name.into());
        self
    }

    pub fn is_hidden_field(mut self, name: impl Into<String>) -> Self {
        self.is_hidden_field = Some(name.into());
        self
    }

    pub fn has_children_field(mut self, name: impl Into<String>) -> Self {
        self.has_children_field = Some(name.into());
        self
    }

    pub fn action_mapping(mut self, mapping: ActionMappingOptions) -> Self {
        self.action_mapping = mapping;
        self
    }

    pub fn level_padding(mut self, padding: u32) -> Self {
        self.level_padding = Some(padding);
        self
    }

    pub fn use_virtual_scroll(mut self, enabled: bool) -> Self {
        self.use_virtual_scroll = Some(enabled);
        self
    }

    pub fn node_height(mut self, height: u32) -> Self {
        self.node_height = Some(NodeHeight::Fixed(height));
        self
    }

    pub fn node_height_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&NodeRef<'_>) -> u32 + Send + Sync + 'static,
    {
        self.node_height = Some(NodeHeight::Computed(Arc::new(f)));
        self
    }

    pub fn enable_drag_and_drop(mut self, enabled: bool) -> Self {
        self.enable_drag_and_drop = Some(enabled);
        self
    }

    pub fn drop_slot_height(mut self, height: u32) -> Self {
        self.drop_slot_height = Some(height);
        self
    }

    pub fn allow_drag<F>(mut self, f: F) -> Self
    where
        F: Fn(&NodeRef<'_>) -> bool + Send + Sync + 'static,
    {
        self.allow_drag = Some(Arc::new(f));
        self
    }

    pub fn allow_drop<F>(mut self, f: F) -> Self
    where
        F: Fn(&RawItem, &DropTarget, Option<&InputEvent>) -> bool + Send + Sync + 'static,
    {
        self.allow_drop = Some(Arc::new(f));
        self
    }

    pub fn get_children<F>(mut self, f: F) -> Self
    where
        F: Fn(&NodeRef<'_>) -> ChildrenSource + Send + Sync + 'static,
    {
        self.get_children = Some(Arc::new(f));
        self
    }

    pub fn node_class<F>(mut self, f: F) -> Self
    where
        F: Fn(&NodeRef<'_>) -> String + Send + Sync + 'static,
    {
        self.node_class = Some(Arc::new(f));
        self
    }

    /// Fill in defaults and build field accessors.
    pub fn resolve(&self) -> ResolvedOptions {
        let field_or = |name: &Option<String>, default: &str| {
            field::field(name.as_deref().unwrap_or(default))
        };

        let node_height: NodeHeightFn = match &self.node_height {
            Some(NodeHeight::Computed(f)) => Arc::clone(f),
            Some(NodeHeight::Fixed(h)) => {
                let h = *h;
                Arc::new(move |_: &NodeRef<'_>| h)
            }
            None => Arc::new(|_: &NodeRef<'_>| DEFAULT_NODE_HEIGHT),
        };

        ResolvedOptions {
            children_field: field_or(&self.children_field, DEFAULT_CHILDREN_FIELD),
            display_field: field_or(&self.display_field, DEFAULT_DISPLAY_FIELD),
            id_field: field_or(&self.id_field, DEFAULT_ID_FIELD),
            is_expanded_field: field_or(&self.is_expanded_field, DEFAULT_IS_EXPANDED_FIELD),
            is_hidden_field: field_or(&self.is_hidden_field, DEFAULT_IS_HIDDEN_FIELD),
            has_children_field: field_or(&self.has_children_field, DEFAULT_HAS_CHILDREN_FIELD),
            action_mapping: ActionMapping::resolve(&self.action_mapping),
            level_padding: self.level_padding.unwrap_or(DEFAULT_LEVEL_PADDING),
            use_virtual_scroll: self.use_virtual_scroll.unwrap_or(false),
            node_height,
            enable_drag_and_drop: self.enable_drag_and_drop.unwrap_or(false),
            drop_slot_height: self.drop_slot_height.unwrap_or(DEFAULT_DROP_SLOT_HEIGHT),
            allow_drag: self
                .allow_drag
                .clone()
                .unwrap_or_else(|| Arc::new(|_: &NodeRef<'_>| true)),
            allow_drop: self.allow_drop.clone().unwrap_or_else(|| {
                Arc::new(|_: &RawItem, _: &DropTarget, _: Option<&InputEvent>| true)
            }),
            get_children: self.get_children.clone(),
            node_class: self
                .node_class
                .clone()
                .unwrap_or_else(|| Arc::new(|_: &NodeRef<'_>| String::new())),
        }
    }
}

/// Complete configuration with every default applied.
#[derive(Clone)]
pub struct ResolvedOptions {
    pub children_field: Field,
    pub display_field: Field,
    pub id_field: Field,
    pub is_expanded_field: Field,
    pub is_hidden_field: Field,
    pub has_children_field: Field,
    pub action_mapping: ActionMapping,
    pub level_padding: u32,
    pub use_virtual_scroll: bool,
    pub node_height: NodeHeightFn,
    pub enable_drag_and_drop: bool,
    /// Reported to the renderer; row heights use the fixed drop slot.
    pub drop_slot_height: u32,
    pub allow_drag: DragPredicate,
    pub allow_drop: DropPredicate,
    pub get_children: Option<ChildrenLoader>,
    pub node_class: NodeClassFn,
}

impl Default for ResolvedOptions {
    fn default() -> Self {
        TreeOptions::default().resolve()
    }
}

impl From<TreeOptions> for ResolvedOptions {
    fn from(options: TreeOptions) -> Self {
        options.resolve()
    }
}

impl fmt::Debug for ResolvedOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedOptions")
            .field("children_field", &self.children_field)
            .field("display_field", &self.display_field)
            .field("id_field", &self.id_field)
            .field("is_expanded_field", &self.is_expanded_field)
            .field("is_hidden_field", &self.is_hidden_field)
            .field("has_children_field", &self.has_children_field)
            .field("action_mapping", &self.action_mapping)
            .field("level_padding", &self.level_padding)
            .field("use_virtual_scroll", &self.use_virtual_scroll)
            .field("enable_drag_and_drop", &self.enable_drag_and_drop)
            .field("drop_slot_height", &self.drop_slot_height)
            .field("get_children", &self.get_children.is_some())
            .finish_non_exhaustive()
    }
}

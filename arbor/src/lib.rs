//! Interactive tree-widget state model.
//!
//! `arbor` wraps arbitrary hierarchical JSON data into addressable nodes and
//! maintains expansion, activation, focus, filtering and ordering state for a
//! tree widget. Rendering, scrolling and event binding are left to the host;
//! the host feeds raw input through [`TreeModel::handle_input`], reads node
//! state through [`NodeRef`], and drains [`TreeEvent`]s.

pub mod actions;
pub mod children;
pub mod error;
pub mod events;
pub mod field;
pub mod input;
pub mod layout;
pub mod model;
pub mod node;
pub mod options;
pub mod selection;
pub mod tree;

pub use actions::{Action, ActionExtra, ActionMapping, ActionMappingOptions, BuiltinAction};
pub use error::{LoadError, OptionsError};
pub use model::{DropTarget, NodeFilter, TreeModel};
pub use node::{NodeId, NodeRef};
pub use options::{ResolvedOptions, TreeOptions};
pub use tree::Tree;

pub mod prelude {
    pub use crate::actions::{
        Action, ActionExtra, ActionMapping, ActionMappingOptions, ActionOverride, BuiltinAction,
    };
    pub use crate::children::{ChildrenLoad, ChildrenSource, ChildrenState, LoadCompletion};
    pub use crate::error::{LoadError, OptionsError};
    pub use crate::events::TreeEvent;
    pub use crate::field::{ItemId, RawItem};
    pub use crate::input::{InputEvent, Modifiers, MouseGesture, Trigger, keys};
    pub use crate::model::{DropTarget, NodeFilter, TreeModel};
    pub use crate::node::{NodeId, NodeRef};
    pub use crate::options::{NodeHeight, ResolvedOptions, TreeOptions};
    pub use crate::tree::Tree;
}

//! Node-level event stream.
//!
//! The model pushes events as state changes; the rendering collaborator
//! drains them with `TreeModel::drain_events()` after each interaction.

use crate::error::LoadError;
use crate::model::DropTarget;
use crate::node::NodeId;

/// A tree state change.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeEvent {
    Expanded { node: NodeId },
    Collapsed { node: NodeId },
    Activated { node: NodeId },
    Deactivated { node: NodeId },
    Focused { node: NodeId },
    Blurred { node: NodeId },
    /// A node was relinked under a new parent and/or position.
    Moved {
        node: NodeId,
        from: DropTarget,
        to: DropTarget,
    },
    /// Lazily requested children were spliced in.
    ChildrenLoaded { node: NodeId },
    /// A children loader reported a failure.
    LoadFailed { node: NodeId, error: LoadError },
    /// The whole forest was rebuilt; previous node ids are stale.
    Updated,
}

impl TreeEvent {
    /// Event name as exposed to the rendering collaborator.
    pub fn name(&self) -> &'static str {
        match self {
            TreeEvent::Expanded { .. } => "expanded",
            TreeEvent::Collapsed { .. } => "collapsed",
            TreeEvent::Activated { .. } => "activated",
            TreeEvent::Deactivated { .. } => "deactivated",
            TreeEvent::Focused { .. } => "focused",
            TreeEvent::Blurred { .. } => "blurred",
            TreeEvent::Moved { .. } => "moved",
            TreeEvent::ChildrenLoaded { .. } => "childrenLoaded",
            TreeEvent::LoadFailed { .. } => "loadFailed",
            TreeEvent::Updated => "updated",
        }
    }

    /// The node the event concerns, if any.
    pub fn node(&self) -> Option<NodeId> {
        match self {
            TreeEvent::Expanded { node }
            | TreeEvent::Collapsed { node }
            | TreeEvent::Activated { node }
            | TreeEvent::Deactivated { node }
            | TreeEvent::Focused { node }
            | TreeEvent::Blurred { node }
            | TreeEvent::Moved { node, .. }
            | TreeEvent::ChildrenLoaded { node }
            | TreeEvent::LoadFailed { node, .. } => Some(*node),
            TreeEvent::Updated => None,
        }
    }
}

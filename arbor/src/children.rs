//! Children resolution state and asynchronous loading.
//!
//! A node's children are in exactly one of four states. Only `Loaded`
//! contributes children to traversal; every other state reads as "no
//! children" for that query, so nothing ever blocks on a load.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::error::LoadError;
use crate::field::RawItem;
use crate::node::{NodeId, NodeRef};

/// Resolution state of a node's children.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ChildrenState {
    /// Not requested yet.
    #[default]
    Unloaded,
    /// A load is in flight. `serial` identifies it.
    Loading { serial: u64 },
    /// Children are present (possibly empty: a leaf).
    Loaded(Vec<NodeId>),
    /// The last load failed.
    Failed(LoadError),
}

impl ChildrenState {
    /// Check if children are resolved
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// Check if a load is in flight
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// Check if the last load failed
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Resolved child ids, empty for any unresolved state.
    pub fn ids(&self) -> &[NodeId] {
        match self {
            Self::Loaded(ids) => ids,
            _ => &[],
        }
    }

    /// Get the error if present
    pub fn as_error(&self) -> Option<&LoadError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// What a children loader hands back.
pub enum ChildrenSource {
    /// Items available right away; spliced in immediately.
    Ready(Vec<RawItem>),
    /// Items arrive later.
    Pending(BoxFuture<'static, Result<Vec<RawItem>, LoadError>>),
}

impl ChildrenSource {
    pub fn ready(items: Vec<RawItem>) -> Self {
        Self::Ready(items)
    }

    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = Result<Vec<RawItem>, LoadError>> + Send + 'static,
    {
        Self::Pending(future.boxed())
    }
}

impl fmt::Debug for ChildrenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(items) => f.debug_tuple("Ready").field(&items.len()).finish(),
            Self::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// Loader invoked when an unresolved node needs its children.
pub type ChildrenLoader = Arc<dyn Fn(&NodeRef<'_>) -> ChildrenSource + Send + Sync>;

/// Identifies one in-flight load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    pub node: NodeId,
    pub serial: u64,
}

/// An in-flight load handed to the host to drive.
pub struct ChildrenLoad {
    ticket: LoadTicket,
    future: BoxFuture<'static, Result<Vec<RawItem>, LoadError>>,
}

impl ChildrenLoad {
    pub(crate) fn new(
        ticket: LoadTicket,
        future: BoxFuture<'static, Result<Vec<RawItem>, LoadError>>,
    ) -> Self {
        Self { ticket, future }
    }

    pub fn ticket(&self) -> LoadTicket {
        self.ticket
    }

    /// Await the loader and package its result for `TreeModel::complete_load`.
    pub async fn run(self) -> LoadCompletion {
        let result = self.future.await;
        LoadCompletion {
            ticket: self.ticket,
            result,
        }
    }
}

impl fmt::Debug for ChildrenLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildrenLoad")
            .field("ticket", &self.ticket)
            .finish_non_exhaustive()
    }
}

/// Result of a finished load.
#[derive(Debug, Clone)]
pub struct LoadCompletion {
    pub ticket: LoadTicket,
    pub result: Result<Vec<RawItem>, LoadError>,
}

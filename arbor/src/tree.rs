use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::join_all;
use log::debug;

use crate::actions::ActionExtra;
use crate::children::ChildrenLoad;
use crate::field::RawItem;
use crate::input::InputEvent;
use crate::model::TreeModel;
use crate::node::NodeId;
use crate::options::TreeOptions;

/// Shared handle to a tree model.
///
/// `Tree` serializes every mutation through one mutex per tree and is cheap
/// to clone, so handlers on a multi-threaded host can hold it across task
/// boundaries. The dirty flag tells a renderer something changed since it
/// last looked.
///
/// # Example
///
/// ```ignore
/// let tree = Tree::new(TreeModel::new(roots, options));
/// tree.handle_input(node, &InputEvent::key(keys::RIGHT), None);
/// tree.resolve_pending_loads().await;
/// if tree.is_dirty() {
///     render(&tree);
///     tree.clear_dirty();
/// }
/// ```
#[derive(Debug)]
pub struct Tree {
    inner: Arc<Mutex<TreeModel>>,
    dirty: Arc<AtomicBool>,
}

impl Tree {
    /// Wrap a model
    pub fn new(model: TreeModel) -> Self {
        Self {
            inner: Arc::new(Mutex::new(model)),
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Build a model from root items and wrap it
    pub fn from_data(roots: Vec<RawItem>, options: TreeOptions) -> Self {
        Self::new(TreeModel::new(roots, options))
    }

    fn lock(&self) -> MutexGuard<'_, TreeModel> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Read the model
    pub fn read<R>(&self, f: impl FnOnce(&TreeModel) -> R) -> R {
        f(&self.lock())
    }

    /// Mutate the model and mark the tree dirty
    pub fn update<R>(&self, f: impl FnOnce(&mut TreeModel) -> R) -> R {
        let result = f(&mut self.lock());
        self.dirty.store(true, Ordering::SeqCst);
        result
    }

    /// Dispatch a raw input event. Marks the tree dirty if an action ran.
    pub fn handle_input(
        &self,
        node: NodeId,
        event: &InputEvent,
        extra: Option<&ActionExtra>,
    ) -> bool {
        let handled = self.lock().handle_input(node, event, extra);
        if handled {
            self.dirty.store(true, Ordering::SeqCst);
        }
        handled
    }

    /// Drive every queued children load to completion, including loads
    /// queued by the results themselves. The lock is never held across an
    /// await. Returns the number of loads applied.
    pub async fn resolve_pending_loads(&self) -> usize {
        let mut applied = 0;
        loop {
            let loads = self.lock().take_pending_loads();
            if loads.is_empty() {
                break;
            }
            debug!("Driving {} children loads", loads.len());
            let completions = join_all(loads.into_iter().map(ChildrenLoad::run)).await;
            {
                let mut model = self.lock();
                for completion in completions {
                    if model.complete_load(completion) {
                        applied += 1;
                    }
                }
            }
            self.dirty.store(true, Ordering::SeqCst);
        }
        applied
    }

    /// Check if the tree has been modified since last check
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}

impl Clone for Tree {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            dirty: Arc::clone(&self.dirty),
        }
    }
}

//! Row geometry used by renderers and virtual scrolling.

use crate::node::NodeRef;
use crate::options::ResolvedOptions;

/// Items with a truthy value under this key are zero-height placeholders.
pub const VIRTUAL_FIELD: &str = "virtual";

/// Extra height reserved above a row for its drop slot.
///
/// The first child of a parent also carries the slot below its parent row.
pub fn drop_slot_units(index: usize) -> u32 {
    if index == 0 { 2 } else { 1 }
}

/// Full row height for a node.
pub fn node_height(options: &ResolvedOptions, node: &NodeRef<'_>) -> u32 {
    if node.is_virtual() {
        return 0;
    }
    (options.node_height)(node).saturating_add(drop_slot_units(node.index()))
}

/// Left padding for a row at `level`. Roots get none.
pub fn node_padding(options: &ResolvedOptions, level: usize) -> u32 {
    options
        .level_padding
        .saturating_mul(level.saturating_sub(1) as u32)
}

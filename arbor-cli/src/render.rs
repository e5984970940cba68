//! Plain-text rendering of the visible rows.

use std::io::Write;

use arbor::{NodeRef, TreeModel};

use crate::error::CliError;

/// Write one line per visible row, then a summary line.
///
/// Rows are indented by the node's padding, prefixed with `+` (collapsed
/// with children), `-` (expanded), `~` (loading) or a blank, and suffixed
/// with `*` when active and `>` when focused.
pub fn render(model: &TreeModel, out: &mut impl Write) -> Result<(), CliError> {
    let rows = model.visible_sequence();
    for &id in &rows {
        let Some(node) = model.node(id) else {
            continue;
        };
        writeln!(out, "{}", row(&node))?;
    }

    let active = model.active_nodes().len();
    let hidden = model
        .preorder(None)
        .into_iter()
        .filter_map(|id| model.node(id))
        .filter(|n| n.is_hidden())
        .count();
    writeln!(
        out,
        "-- {} visible, {} total, {} hidden, {} active",
        rows.len(),
        model.node_count(),
        hidden,
        active
    )?;
    Ok(())
}

fn row(node: &NodeRef<'_>) -> String {
    let marker = if node.is_loading() {
        '~'
    } else if node.is_leaf() {
        ' '
    } else if node.is_expanded() {
        '-'
    } else {
        '+'
    };
    let name = node
        .display_field()
        .unwrap_or_else(|| node.item_id().to_string());

    let mut flags = String::new();
    if node.is_active() {
        flags.push('*');
    }
    if node.is_focused() {
        flags.push('>');
    }

    let indent = " ".repeat(node.get_node_padding() as usize);
    if flags.is_empty() {
        format!("{indent}{marker} {name}  h={}", node.height())
    } else {
        format!("{indent}{marker} {name} {flags}  h={}", node.height())
    }
}

//! Interaction scripts.
//!
//! A script is a list of steps, each one of:
//!
//! - a key: `down`, `up`, `left`, `right`, `space`, `enter` or a numeric
//!   key code, applied to the focused node
//! - a gesture on a node: `click:ID`, `expanderClick:ID`, `dblClick:ID`, ...
//! - a drag-and-drop move: `move:ID:PARENT:INDEX`, with `-` as PARENT for
//!   the root list
//!
//! Keys and gestures accept modifier prefixes such as `ctrl+click:ID`.

use arbor::input::{Modifiers, MouseGesture, keys};

use crate::error::CliError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Key {
        code: u16,
        modifiers: Modifiers,
    },
    Mouse {
        gesture: MouseGesture,
        target: String,
        modifiers: Modifiers,
    },
    Move {
        node: String,
        parent: Option<String>,
        index: usize,
    },
}

pub fn parse(tokens: &[String]) -> Result<Vec<Step>, CliError> {
    tokens
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(parse_step)
        .collect()
}

fn parse_step(token: &str) -> Result<Step, CliError> {
    let invalid = || CliError::InvalidStep(token.to_string());

    if let Some(rest) = token.strip_prefix("move:") {
        let mut parts = rest.split(':');
        let (Some(node), Some(parent), Some(index), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        let index = index.parse().map_err(|_| invalid())?;
        let parent = (parent != "-").then(|| parent.to_string());
        return Ok(Step::Move {
            node: node.to_string(),
            parent,
            index,
        });
    }

    let (modifiers, rest) = split_modifiers(token);
    match rest.split_once(':') {
        Some((gesture, target)) => {
            let gesture = MouseGesture::from_name(gesture).ok_or_else(invalid)?;
            Ok(Step::Mouse {
                gesture,
                target: target.to_string(),
                modifiers,
            })
        }
        None => {
            let code = key_code(rest).ok_or_else(invalid)?;
            Ok(Step::Key { code, modifiers })
        }
    }
}

fn split_modifiers(token: &str) -> (Modifiers, &str) {
    let mut modifiers = Modifiers::NONE;
    let mut rest = token;
    while let Some((prefix, tail)) = rest.split_once('+') {
        match prefix.to_ascii_lowercase().as_str() {
            "ctrl" => modifiers.ctrl = true,
            "shift" => modifiers.shift = true,
            "alt" => modifiers.alt = true,
            "meta" => modifiers.meta = true,
            _ => break,
        }
        rest = tail;
    }
    (modifiers, rest)
}

fn key_code(name: &str) -> Option<u16> {
    match name.to_ascii_lowercase().as_str() {
        "down" => Some(keys::DOWN),
        "up" => Some(keys::UP),
        "left" => Some(keys::LEFT),
        "right" => Some(keys::RIGHT),
        "space" => Some(keys::SPACE),
        "enter" => Some(keys::ENTER),
        other => other.parse().ok(),
    }
}

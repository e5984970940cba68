//! Raw input events as delivered by the host UI.

use std::fmt;

use serde::Deserialize;

/// Numeric key codes understood by the default action mapping.
pub mod keys {
    pub const ENTER: u16 = 13;
    pub const SPACE: u16 = 32;
    pub const LEFT: u16 = 37;
    pub const UP: u16 = 38;
    pub const RIGHT: u16 = 39;
    pub const DOWN: u16 = 40;
}

/// Mouse gestures that can carry an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MouseGesture {
    Click,
    DblClick,
    ContextMenu,
    ExpanderClick,
    DragStart,
    Drag,
    DragEnd,
    DragOver,
    DragLeave,
    DragEnter,
    Drop,
}

impl MouseGesture {
    /// All gestures, in mapping order.
    pub const ALL: [MouseGesture; 11] = [
        MouseGesture::Click,
        MouseGesture::DblClick,
        MouseGesture::ContextMenu,
        MouseGesture::ExpanderClick,
        MouseGesture::DragStart,
        MouseGesture::Drag,
        MouseGesture::DragEnd,
        MouseGesture::DragOver,
        MouseGesture::DragLeave,
        MouseGesture::DragEnter,
        MouseGesture::Drop,
    ];

    /// The gesture's name in the action-mapping surface.
    pub fn name(self) -> &'static str {
        match self {
            MouseGesture::Click => "click",
            MouseGesture::DblClick => "dblClick",
            MouseGesture::ContextMenu => "contextMenu",
            MouseGesture::ExpanderClick => "expanderClick",
            MouseGesture::DragStart => "dragStart",
            MouseGesture::Drag => "drag",
            MouseGesture::DragEnd => "dragEnd",
            MouseGesture::DragOver => "dragOver",
            MouseGesture::DragLeave => "dragLeave",
            MouseGesture::DragEnter => "dragEnter",
            MouseGesture::Drop => "drop",
        }
    }

    /// Parse a gesture from its mapping name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.name() == name)
    }
}

impl fmt::Display for MouseGesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Modifier keys state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Control key held
    pub ctrl: bool,
    /// Shift key held
    pub shift: bool,
    /// Alt key held
    pub alt: bool,
    /// Meta/command key held
    pub meta: bool,
}

impl Modifiers {
    /// No modifiers
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
        alt: false,
        meta: false,
    };

    /// Whether the modifiers request additive (multi) selection.
    pub fn multi_select(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// What produced an input event: a mouse gesture or a key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Mouse(MouseGesture),
    Key(u16),
}

/// A raw input event handed to the action dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub trigger: Trigger,
    pub modifiers: Modifiers,
}

impl InputEvent {
    /// A mouse gesture without modifiers.
    pub const fn mouse(gesture: MouseGesture) -> Self {
        Self {
            trigger: Trigger::Mouse(gesture),
            modifiers: Modifiers::NONE,
        }
    }

    /// A key press without modifiers.
    pub const fn key(code: u16) -> Self {
        Self {
            trigger: Trigger::Key(code),
            modifiers: Modifiers::NONE,
        }
    }

    /// Add the ctrl modifier
    pub const fn ctrl(mut self) -> Self {
        self.modifiers.ctrl = true;
        self
    }
}

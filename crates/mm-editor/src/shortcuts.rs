//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. `key` is the
//! DOM `KeyboardEvent.key` value (`"t"`, `"ArrowUp"`, `"F2"`); on macOS
//! `meta` is ⌘, elsewhere `ctrl` plays the same role.

use mm_core::model::Direction;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyInput {
    pub key: String,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl KeyInput {
    /// A key with no modifiers.
    pub fn plain(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ..Self::default()
        }
    }

    /// ⌘/Ctrl + key.
    pub fn accel(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ctrl: true,
            ..Self::default()
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Tabs ──
    NewTab,
    CloseTab,
    NextTab,
    PrevTab,

    // ── Files ──
    Save,
    SaveAs,
    Open,

    // ── Map ──
    Navigate(Direction),
    AddSibling,
    AddChild,
    RemoveNode,
    Rename,

    // ── Inline editor ──
    CommitEdit,
    CancelEdit,
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action. `editing` is true while the inline
    /// label editor is open; it then swallows everything except tab
    /// shortcuts, Enter and Escape. Returns `None` if the combo has no
    /// binding.
    pub fn resolve(input: &KeyInput, editing: bool) -> Option<ShortcutAction> {
        let cmd = input.ctrl || input.meta;
        let key = input.key.as_str();

        // ── Tab shortcuts work everywhere ──
        if cmd {
            match key {
                "t" | "T" => return Some(ShortcutAction::NewTab),
                "w" | "W" => return Some(ShortcutAction::CloseTab),
                "Tab" if input.shift => return Some(ShortcutAction::PrevTab),
                "Tab" => return Some(ShortcutAction::NextTab),
                _ => {}
            }
        }

        if editing {
            return match key {
                "Enter" => Some(ShortcutAction::CommitEdit),
                "Escape" => Some(ShortcutAction::CancelEdit),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "s" | "S" if input.shift => Some(ShortcutAction::SaveAs),
                "s" | "S" => Some(ShortcutAction::Save),
                "o" | "O" => Some(ShortcutAction::Open),
                _ => None,
            };
        }

        // ── Single keys ──
        match key {
            "ArrowUp" => Some(ShortcutAction::Navigate(Direction::Up)),
            "ArrowDown" => Some(ShortcutAction::Navigate(Direction::Down)),
            "ArrowLeft" => Some(ShortcutAction::Navigate(Direction::Left)),
            "ArrowRight" => Some(ShortcutAction::Navigate(Direction::Right)),
            "Enter" => Some(ShortcutAction::AddSibling),
            "Insert" | "Tab" => Some(ShortcutAction::AddChild),
            "Delete" | "Backspace" => Some(ShortcutAction::RemoveNode),
            "F2" => Some(ShortcutAction::Rename),
            _ => None,
        }
    }
}

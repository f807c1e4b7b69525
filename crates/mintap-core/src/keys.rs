//! Keyboard input types.
//!
//! Platform-agnostic key and modifier definitions. Hosts translate their
//! native keyboard events into [`KeyEvent`] before handing them to the
//! resize engine or rendering shortcut hints.

use smol_str::SmolStr;

use crate::platform::Platform;
use crate::shortcut::shortcut_key_for;

/// Key values, following the names used by DOM `KeyboardEvent.key`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A character key.
    Character(SmolStr),

    /// Unknown/unidentified key.
    Unidentified,

    // === Whitespace / editing ===
    Backspace,
    Delete,
    Enter,
    Tab,
    Escape,
    Space,

    // === Navigation ===
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,

    // === Modifiers ===
    Alt,
    Control,
    Meta,
    Shift,
}

impl Key {
    /// Create a character key.
    pub fn character(s: impl Into<SmolStr>) -> Self {
        Self::Character(s.into())
    }

    /// Parse a DOM `KeyboardEvent.key` value.
    pub fn parse(s: &str) -> Self {
        match s {
            "Backspace" => Self::Backspace,
            "Delete" => Self::Delete,
            "Enter" => Self::Enter,
            "Tab" => Self::Tab,
            "Escape" | "Esc" => Self::Escape,
            " " | "Space" => Self::Space,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            "Home" => Self::Home,
            "End" => Self::End,
            "Alt" => Self::Alt,
            "Control" => Self::Control,
            "Meta" => Self::Meta,
            "Shift" => Self::Shift,
            "" | "Unidentified" => Self::Unidentified,
            other => Self::Character(SmolStr::new(other)),
        }
    }

    /// Check if this is a modifier key.
    pub fn is_modifier(&self) -> bool {
        matches!(self, Self::Alt | Self::Control | Self::Meta | Self::Shift)
    }

    /// Name used when rendering the key in a shortcut hint.
    pub fn display_name(&self) -> SmolStr {
        match self {
            Self::Character(c) => SmolStr::new(c.to_uppercase()),
            Self::Unidentified => SmolStr::new_static("?"),
            Self::Backspace => SmolStr::new_static("Backspace"),
            Self::Delete => SmolStr::new_static("Delete"),
            Self::Enter => SmolStr::new_static("Enter"),
            Self::Tab => SmolStr::new_static("Tab"),
            Self::Escape => SmolStr::new_static("Esc"),
            Self::Space => SmolStr::new_static("Space"),
            Self::ArrowLeft => SmolStr::new_static("←"),
            Self::ArrowRight => SmolStr::new_static("→"),
            Self::ArrowUp => SmolStr::new_static("↑"),
            Self::ArrowDown => SmolStr::new_static("↓"),
            Self::Home => SmolStr::new_static("Home"),
            Self::End => SmolStr::new_static("End"),
            Self::Alt => SmolStr::new_static("Alt"),
            Self::Control => SmolStr::new_static("Ctrl"),
            Self::Meta => SmolStr::new_static("Meta"),
            Self::Shift => SmolStr::new_static("Shift"),
        }
    }
}

/// Modifier key state for a key combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    pub const ALT: Self = Self {
        alt: true,
        ..Self::NONE
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    pub const META: Self = Self {
        meta: true,
        ..Self::NONE
    };

    /// Get the primary modifier for the platform (Cmd on Mac, Ctrl elsewhere).
    pub fn primary(is_mac: bool) -> Self {
        if is_mac { Self::META } else { Self::CTRL }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

/// A keyboard event as seen by the editor core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn is_escape(&self) -> bool {
        self.key == Key::Escape
    }
}

/// A key combination for triggering an action.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyCombo {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn primary(key: Key, is_mac: bool) -> Self {
        Self {
            key,
            modifiers: Modifiers::primary(is_mac),
        }
    }

    /// Whether a key event triggers this combination.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.modifiers == event.modifiers
            && match (&self.key, &event.key) {
                (Key::Character(a), Key::Character(b)) => a.eq_ignore_ascii_case(b),
                (a, b) => a == b,
            }
    }

    /// Human-readable hint such as `⌘ B` or `Ctrl Shift B`.
    ///
    /// Modifiers are listed in a fixed order and rendered with the
    /// platform's symbols.
    pub fn label(&self, platform: &Platform) -> String {
        let mut parts: Vec<SmolStr> = Vec::with_capacity(5);
        if self.modifiers.meta {
            parts.push(if platform.mac {
                shortcut_key_for("mod", platform).symbol
            } else {
                SmolStr::new_static("Meta")
            });
        }
        if self.modifiers.ctrl {
            parts.push(if platform.mac {
                SmolStr::new_static("⌃")
            } else {
                shortcut_key_for("mod", platform).symbol
            });
        }
        if self.modifiers.alt {
            parts.push(shortcut_key_for("alt", platform).symbol);
        }
        if self.modifiers.shift {
            parts.push(shortcut_key_for("shift", platform).symbol);
        }
        parts.push(self.key.display_name());
        parts
            .iter()
            .map(SmolStr::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Result of offering an input event to an engine.
///
/// `Handled` means the host should prevent the default action and stop
/// propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Event was consumed.
    Handled,
    /// Event was not relevant, let the host handle it.
    NotHandled,
}

impl EventOutcome {
    pub fn is_handled(self) -> bool {
        self == Self::Handled
    }
}

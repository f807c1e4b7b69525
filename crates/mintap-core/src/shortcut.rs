//! Shortcut key labels for toolbar tooltips.

use smol_str::SmolStr;

use crate::platform::{Platform, platform};

/// Symbol and spoken name for one key of a shortcut.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutKey {
    pub symbol: SmolStr,
    pub readable: SmolStr,
}

impl ShortcutKey {
    fn fixed(symbol: &'static str, readable: &'static str) -> Self {
        Self {
            symbol: SmolStr::new_static(symbol),
            readable: SmolStr::new_static(readable),
        }
    }
}

/// Label for `key` on the given platform.
///
/// `mod`, `alt` and `shift` (any case) map to the platform's modifier
/// names; every other key is returned as-is.
pub fn shortcut_key_for(key: &str, platform: &Platform) -> ShortcutKey {
    match (key.to_lowercase().as_str(), platform.mac) {
        ("mod", true) => ShortcutKey::fixed("⌘", "Command"),
        ("mod", false) => ShortcutKey::fixed("Ctrl", "Control"),
        ("alt", true) => ShortcutKey::fixed("⌥", "Option"),
        ("alt", false) => ShortcutKey::fixed("Alt", "Alt"),
        ("shift", true) => ShortcutKey::fixed("⇧", "Shift"),
        ("shift", false) => ShortcutKey::fixed("Shift", "Shift"),
        _ => ShortcutKey {
            symbol: SmolStr::new(key),
            readable: SmolStr::new(key),
        },
    }
}

/// Label for `key` on the current platform.
pub fn shortcut_key(key: &str) -> ShortcutKey {
    shortcut_key_for(key, platform())
}

/// Labels for a sequence of keys on the current platform.
pub fn shortcut_keys<S: AsRef<str>>(keys: &[S]) -> Vec<ShortcutKey> {
    keys.iter().map(|k| shortcut_key(k.as_ref())).collect()
}

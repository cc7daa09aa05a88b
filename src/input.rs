// Price input guards: sanitising, keystroke and paste filtering

use std::fmt::Display;

const ALLOWED_NAVIGATION_KEYS: [&str; 7] = [
    "Backspace",
    "Delete",
    "ArrowLeft",
    "ArrowRight",
    "Tab",
    "Home",
    "End",
];

// Combined with Ctrl/Cmd: select-all, copy, paste, cut
const SHORTCUT_KEYS: [&str; 4] = ["a", "c", "v", "x"];

/// A keystroke as delivered by the host page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: String,
    pub ctrl_key: bool,
    pub meta_key: bool,
    default_prevented: bool,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ctrl_key: false,
            meta_key: false,
            default_prevented: false,
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl_key = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta_key = true;
        self
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// A paste carrying the clipboard's plain-text payload, if any.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PasteEvent {
    pub text: Option<String>,
    default_prevented: bool,
}

impl PasteEvent {
    pub fn new(text: Option<String>) -> Self {
        Self {
            text,
            default_prevented: false,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Strips every non-digit character; `"12a3€"` becomes `"123"`.
pub fn sanitize_numeric_input(value: impl Display) -> String {
    value
        .to_string()
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect()
}

pub fn is_digits_only(text: &str) -> bool {
    text.chars().all(|c| c.is_ascii_digit())
}

pub fn is_allowed_price_key(event: &KeyEvent) -> bool {
    let is_shortcut = (event.ctrl_key || event.meta_key)
        && SHORTCUT_KEYS.contains(&event.key.to_lowercase().as_str());
    if ALLOWED_NAVIGATION_KEYS.contains(&event.key.as_str()) || is_shortcut {
        return true;
    }

    let mut chars = event.key.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_ascii_digit())
}

pub fn is_valid_numeric_paste(event: &PasteEvent) -> bool {
    is_digits_only(event.text.as_deref().unwrap_or(""))
}

/// Cancels the keystroke unless it can only produce a digit-only value.
pub fn handle_price_keydown(event: &mut KeyEvent) {
    if !is_allowed_price_key(event) {
        tracing::debug!("Suppressed price keystroke '{}'", event.key);
        event.prevent_default();
    }
}

/// Cancels the paste unless the clipboard text is digits only (empty allowed).
pub fn handle_price_paste(event: &mut PasteEvent) {
    if !is_valid_numeric_paste(event) {
        tracing::debug!("Suppressed non-numeric price paste");
        event.prevent_default();
    }
}

//! Password field values
//!
//! Secret inputs are zeroed in memory when they are cleared or dropped and
//! never show their contents in Debug output.

use std::fmt;

use zeroize::Zeroizing;

/// A password input with its own visibility toggle
#[derive(Clone, Default)]
pub struct SecretInput {
    value: Zeroizing<String>,
    visible: bool,
}

impl SecretInput {
    /// Create an empty, hidden input
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the value; the previous value is zeroed
    pub fn set(&mut self, value: impl Into<String>) {
        self.value = Zeroizing::new(value.into());
    }

    /// Get the current value
    pub fn expose(&self) -> &str {
        &self.value
    }

    /// Clone the value into a fresh zeroizing buffer
    pub fn to_zeroizing(&self) -> Zeroizing<String> {
        Zeroizing::new(self.value.as_str().to_owned())
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Whether the value is rendered in clear text
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Flip visibility and return the new state
    pub fn toggle_visibility(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }
}

impl fmt::Debug for SecretInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretInput")
            .field("len", &self.value.len())
            .field("visible", &self.visible)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let mut input = SecretInput::new();
        input.set("hunter2hunter2");
        let debug = format!("{:?}", input);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("len: 14"));
    }

    #[test]
    fn test_toggle_visibility() {
        let mut input = SecretInput::new();
        assert!(!input.is_visible());
        assert!(input.toggle_visibility());
        assert!(!input.toggle_visibility());
    }

    #[test]
    fn test_set_replaces_value() {
        let mut input = SecretInput::new();
        input.set("first");
        input.set("second");
        assert_eq!(input.expose(), "second");
        assert_eq!(input.to_zeroizing().as_str(), "second");
    }
}

//! Confirmation phrase resolution.
//!
//! Every action kind carries a built-in phrase the approver must type back
//! exactly (see `ActionKind::default_phrase`). Deployments can override
//! individual phrases through configuration; the book resolves overrides
//! first, built-ins second.

use std::collections::BTreeMap;

use switchboard_core::ActionKind;

/// Resolves the confirmation phrase required for each action kind.
#[derive(Debug, Clone, Default)]
pub struct PhraseBook {
    overrides: BTreeMap<String, String>,
}

impl PhraseBook {
    /// A book with only the built-in phrases.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A book with per-kind overrides, keyed by the kind's string label
    /// (e.g. `"freeze"`). Unknown keys are ignored.
    #[must_use]
    pub fn with_overrides(overrides: BTreeMap<String, String>) -> Self {
        Self { overrides }
    }

    /// The phrase an approver must type for this kind of action.
    #[must_use]
    pub fn required_phrase(&self, kind: ActionKind) -> String {
        self.overrides
            .get(kind.as_str())
            .cloned()
            .unwrap_or_else(|| kind.default_phrase().to_string())
    }

    /// Whether a typed phrase matches, byte for byte. No trimming, no
    /// case folding.
    #[must_use]
    pub fn matches(&self, kind: ActionKind, typed: &str) -> bool {
        typed == self.required_phrase(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_phrases() {
        let book = PhraseBook::new();
        assert_eq!(book.required_phrase(ActionKind::Freeze), "FREEZE-UPDATES");
        assert!(book.matches(ActionKind::Freeze, "FREEZE-UPDATES"));
        assert!(!book.matches(ActionKind::Freeze, "freeze-updates"));
        assert!(!book.matches(ActionKind::Freeze, " FREEZE-UPDATES"));
    }

    #[test]
    fn test_override_takes_precedence() {
        let book = PhraseBook::with_overrides(BTreeMap::from([(
            "freeze".to_string(),
            "HALT-UPDATES".to_string(),
        )]));
        assert_eq!(book.required_phrase(ActionKind::Freeze), "HALT-UPDATES");
        // Other kinds keep their built-ins.
        assert_eq!(book.required_phrase(ActionKind::Unfreeze), "UNFREEZE-UPDATES");
    }
}

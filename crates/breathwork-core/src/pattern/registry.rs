//! Built-in plus user-defined patterns and the current selection.

use uuid::Uuid;

use super::{builtin_patterns, BreathingPattern, CustomPattern, PatternDraft, CUSTOM_KEY_PREFIX};
use crate::error::{Result, ValidationError};

/// Holds the immutable built-in list, the mutable custom list, and which
/// pattern is currently selected for the next session.
#[derive(Debug, Clone)]
pub struct PatternRegistry {
    builtins: Vec<BreathingPattern>,
    custom: Vec<CustomPattern>,
    selected: BreathingPattern,
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl PatternRegistry {
    pub fn new(custom: Vec<CustomPattern>) -> Self {
        let builtins = builtin_patterns();
        let selected = builtins[0].clone();
        Self {
            builtins,
            custom,
            selected,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn custom(&self) -> &[CustomPattern] {
        &self.custom
    }

    /// Built-ins first, then custom patterns in creation order.
    pub fn all(&self) -> Vec<BreathingPattern> {
        self.builtins
            .iter()
            .cloned()
            .chain(self.custom.iter().map(BreathingPattern::from))
            .collect()
    }

    pub fn selected(&self) -> &BreathingPattern {
        &self.selected
    }

    /// Look up a pattern by name. Exact matches win over case-insensitive ones.
    pub fn find(&self, name: &str) -> Option<BreathingPattern> {
        let all = self.all();
        all.iter()
            .find(|p| p.name == name)
            .or_else(|| all.iter().find(|p| p.name.eq_ignore_ascii_case(name)))
            .cloned()
    }

    pub fn find_custom(&self, id: &str) -> Option<&CustomPattern> {
        self.custom.iter().find(|p| p.id == id)
    }

    /// Resolve a selection key, a bare custom id, or a name. Ids are tried
    /// first since custom names may repeat or shadow a built-in.
    pub fn resolve(&self, key: &str) -> Option<BreathingPattern> {
        let id = key.strip_prefix(CUSTOM_KEY_PREFIX).unwrap_or(key);
        self.find_custom(id)
            .map(BreathingPattern::from)
            .or_else(|| self.find(key))
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn select_custom(&mut self, id: &str) -> Result<&BreathingPattern> {
        let pattern = self
            .find_custom(id)
            .map(BreathingPattern::from)
            .ok_or_else(|| ValidationError::UnknownPatternId(id.to_string()))?;
        self.selected = pattern;
        Ok(&self.selected)
    }

    /// Select by anything [`resolve`](Self::resolve) accepts. A stale
    /// `custom:<id>` key is an error rather than a lookup by name.
    pub fn select_key(&mut self, key: &str) -> Result<&BreathingPattern> {
        if let Some(id) = key.strip_prefix(CUSTOM_KEY_PREFIX) {
            return self.select_custom(id);
        }
        let pattern = self
            .resolve(key)
            .ok_or_else(|| ValidationError::UnknownPattern(key.to_string()))?;
        self.selected = pattern;
        Ok(&self.selected)
    }

    /// Add a new custom pattern with a fresh id and select it.
    pub fn create(&mut self, draft: PatternDraft) -> &CustomPattern {
        let pattern = draft.into_custom(Uuid::new_v4().to_string());
        self.selected = BreathingPattern::from(&pattern);
        self.custom.push(pattern);
        &self.custom[self.custom.len() - 1]
    }

    /// Replace the custom pattern with this id, keeping the id, and select it.
    pub fn update(&mut self, id: &str, draft: PatternDraft) -> Result<&CustomPattern> {
        let index = self
            .custom
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| ValidationError::UnknownPatternId(id.to_string()))?;
        let pattern = draft.into_custom(id.to_string());
        self.selected = BreathingPattern::from(&pattern);
        self.custom[index] = pattern;
        Ok(&self.custom[index])
    }

    /// Remove a custom pattern. Returns `true` when it was the selection and
    /// the selection fell back to the first built-in.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let before = self.custom.len();
        self.custom.retain(|p| p.id != id);
        if self.custom.len() == before {
            return Err(ValidationError::UnknownPatternId(id.to_string()).into());
        }
        if self.selected.custom_id() == Some(id) {
            self.selected = self.builtins[0].clone();
            return Ok(true);
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, inhale: i64, hold: i64, exhale: i64, hold_empty: i64) -> PatternDraft {
        PatternDraft {
            name: name.into(),
            inhale,
            hold,
            exhale,
            hold_empty,
        }
    }

    #[test]
    fn default_selection_is_first_builtin() {
        let reg = PatternRegistry::default();
        assert_eq!(reg.selected().name, "4-7-8");
        assert_eq!(reg.all().len(), 4);
    }

    #[test]
    fn create_assigns_unique_ids_and_selects() {
        let mut reg = PatternRegistry::default();
        let a = reg.create(draft("A", 3, 0, 3, 0)).id.clone();
        let b = reg.create(draft("B", 5, 5, 5, 5)).id.clone();
        assert_ne!(a, b);
        assert_eq!(reg.custom().len(), 2);
        assert_eq!(reg.selected().custom_id(), Some(b.as_str()));
        assert_eq!(reg.selected().cycle(), 20);
    }

    #[test]
    fn update_preserves_id_and_position() {
        let mut reg = PatternRegistry::default();
        let a = reg.create(draft("A", 3, 0, 3, 0)).id.clone();
        reg.create(draft("B", 5, 5, 5, 5));
        let updated = reg.update(&a, draft("A2", 6, 1, 6, 1)).unwrap();
        assert_eq!(updated.id, a);
        assert_eq!(reg.custom()[0].name, "A2");
        assert_eq!(reg.custom()[0].inhale, 6);
    }

    #[test]
    fn update_unknown_id_fails() {
        let mut reg = PatternRegistry::default();
        assert!(reg.update("missing", PatternDraft::default()).is_err());
    }

    #[test]
    fn deleting_selected_pattern_falls_back() {
        let mut reg = PatternRegistry::default();
        let id = reg.create(draft("Mine", 4, 0, 4, 0)).id.clone();
        assert!(reg.delete(&id).unwrap());
        assert_eq!(reg.selected().name, "4-7-8");
        assert!(reg.custom().is_empty());
    }

    #[test]
    fn deleting_other_pattern_keeps_selection() {
        let mut reg = PatternRegistry::default();
        let first = reg.create(draft("First", 4, 0, 4, 0)).id.clone();
        reg.create(draft("Second", 4, 0, 4, 0));
        assert!(!reg.delete(&first).unwrap());
        assert_eq!(reg.selected().name, "Second");
    }

    #[test]
    fn selection_key_picks_the_right_duplicate() {
        let mut reg = PatternRegistry::default();
        let first = reg.create(draft("Mine", 2, 0, 2, 0)).id.clone();
        let second = reg.create(draft("Mine", 9, 0, 9, 0)).id.clone();
        let key = reg.selected().selection_key();

        let mut reopened = PatternRegistry::new(reg.custom().to_vec());
        assert_eq!(reopened.select_key(&key).unwrap().custom_id(), Some(second.as_str()));
        assert_eq!(reopened.select_custom(&first).unwrap().inhale, 2);
        assert!(reopened.select_custom("missing").is_err());
        assert!(reopened.select_key("custom:missing").is_err());
    }

    #[test]
    fn custom_id_wins_over_shadowed_builtin_name() {
        let mut reg = PatternRegistry::default();
        let id = reg.create(draft("Box Breathing", 7, 0, 7, 0)).id.clone();
        assert!(reg.resolve("Box Breathing").unwrap().is_builtin());
        let key = reg.selected().selection_key();

        let mut reopened = PatternRegistry::new(reg.custom().to_vec());
        let selected = reopened.select_key(&key).unwrap();
        assert_eq!(selected.custom_id(), Some(id.as_str()));
        assert_eq!(selected.inhale, 7);
        assert_eq!(reopened.resolve(&id).unwrap().inhale, 7);
    }

    #[test]
    fn find_falls_back_to_case_insensitive() {
        let reg = PatternRegistry::default();
        assert_eq!(reg.find("box breathing").unwrap().name, "Box Breathing");
        assert!(reg.find("nope").is_none());
    }
}

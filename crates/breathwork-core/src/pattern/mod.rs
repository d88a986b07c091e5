//! Breathing patterns.
//!
//! A pattern is four phase durations in whole seconds. Built-in patterns ship
//! with the crate and never change; custom patterns carry a generated id and
//! are edited at runtime. Both are represented by [`BreathingPattern`], tagged
//! by [`PatternSource`], so the rest of the crate never has to care which kind
//! it is holding.

mod registry;

pub use registry::PatternRegistry;

use serde::{Deserialize, Serialize};

use crate::timer::Phase;

/// Shortest inhale/exhale a custom pattern may use, in seconds.
pub const MIN_BREATH_SECS: u32 = 1;
/// Longest duration for any single phase of a custom pattern, in seconds.
pub const MAX_PHASE_SECS: u32 = 20;
/// Name given to a custom pattern submitted with a blank name.
pub const DEFAULT_CUSTOM_NAME: &str = "My Custom Pattern";
/// Prefix of a selection key that refers to a custom pattern by id.
pub const CUSTOM_KEY_PREFIX: &str = "custom:";

/// Where a pattern came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PatternSource {
    Builtin,
    Custom { id: String },
}

/// A named set of phase durations, built-in or custom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreathingPattern {
    pub name: String,
    pub inhale: u32,
    pub hold: u32,
    pub exhale: u32,
    pub hold_empty: u32,
    #[serde(flatten)]
    pub source: PatternSource,
}

impl BreathingPattern {
    fn builtin(name: &str, inhale: u32, hold: u32, exhale: u32, hold_empty: u32) -> Self {
        Self {
            name: name.to_string(),
            inhale,
            hold,
            exhale,
            hold_empty,
            source: PatternSource::Builtin,
        }
    }

    /// Length of one full breath cycle in seconds.
    pub fn cycle(&self) -> u32 {
        self.inhale + self.hold + self.exhale + self.hold_empty
    }

    /// Duration of `phase` in seconds. `Completed` has no duration.
    pub fn duration_of(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Inhale => self.inhale,
            Phase::Hold => self.hold,
            Phase::Exhale => self.exhale,
            Phase::HoldEmpty => self.hold_empty,
            Phase::Completed => 0,
        }
    }

    /// Id of a custom pattern; `None` for built-ins.
    pub fn custom_id(&self) -> Option<&str> {
        match &self.source {
            PatternSource::Custom { id } => Some(id),
            PatternSource::Builtin => None,
        }
    }

    pub fn is_builtin(&self) -> bool {
        self.source == PatternSource::Builtin
    }

    /// Stable reference used to persist a selection: `custom:<id>` for
    /// custom patterns, the name for built-ins. Custom names are not unique.
    pub fn selection_key(&self) -> String {
        match &self.source {
            PatternSource::Custom { id } => format!("{CUSTOM_KEY_PREFIX}{id}"),
            PatternSource::Builtin => self.name.clone(),
        }
    }
}

/// The patterns that ship with the app. The first one is the default selection.
pub fn builtin_patterns() -> Vec<BreathingPattern> {
    vec![
        BreathingPattern::builtin("4-7-8", 4, 7, 8, 0),
        BreathingPattern::builtin("Box Breathing", 4, 4, 4, 4),
        BreathingPattern::builtin("Calm Focus", 6, 2, 8, 2),
        BreathingPattern::builtin("Energizing", 2, 1, 4, 1),
    ]
}

/// Persisted form of a user-defined pattern.
///
/// No `cycle` is stored; it is derived whenever the pattern is converted into
/// a [`BreathingPattern`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomPattern {
    pub id: String,
    pub name: String,
    pub inhale: u32,
    pub hold: u32,
    pub exhale: u32,
    pub hold_empty: u32,
}

impl From<&CustomPattern> for BreathingPattern {
    fn from(p: &CustomPattern) -> Self {
        Self {
            name: p.name.clone(),
            inhale: p.inhale,
            hold: p.hold,
            exhale: p.exhale,
            hold_empty: p.hold_empty,
            source: PatternSource::Custom { id: p.id.clone() },
        }
    }
}

/// Raw user input for a custom pattern, before clamping.
///
/// Values are signed so that anything a form or command line hands over can
/// be represented; [`PatternDraft::into_custom`] clamps them into range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternDraft {
    pub name: String,
    pub inhale: i64,
    pub hold: i64,
    pub exhale: i64,
    pub hold_empty: i64,
}

impl Default for PatternDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            inhale: 4,
            hold: 4,
            exhale: 4,
            hold_empty: 4,
        }
    }
}

impl PatternDraft {
    /// Start a draft from an existing pattern, for editing.
    pub fn from_pattern(p: &BreathingPattern) -> Self {
        Self {
            name: p.name.clone(),
            inhale: p.inhale.into(),
            hold: p.hold.into(),
            exhale: p.exhale.into(),
            hold_empty: p.hold_empty.into(),
        }
    }

    /// Clamp every field into range and attach `id`.
    pub fn into_custom(self, id: String) -> CustomPattern {
        let name = self.name.trim();
        CustomPattern {
            id,
            name: if name.is_empty() {
                DEFAULT_CUSTOM_NAME.to_string()
            } else {
                name.to_string()
            },
            inhale: clamp_secs(self.inhale, MIN_BREATH_SECS),
            hold: clamp_secs(self.hold, 0),
            exhale: clamp_secs(self.exhale, MIN_BREATH_SECS),
            hold_empty: clamp_secs(self.hold_empty, 0),
        }
    }
}

fn clamp_secs(value: i64, min: u32) -> u32 {
    value.clamp(i64::from(min), i64::from(MAX_PHASE_SECS)) as u32
}

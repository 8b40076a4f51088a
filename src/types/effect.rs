//! Transition effects applied to state changes.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// How a change is applied.
#[derive(
    Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Effect {
    /// Change immediately; the duration is ignored by the bulb.
    #[default]
    Sudden,
    /// Fade over the transition duration.
    Smooth,
}

/// An effect plus its duration in milliseconds (at least 30 ms).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    effect: Effect,
    duration_ms: u32,
}

impl Default for Transition {
    fn default() -> Self {
        Self::sudden()
    }
}

impl Transition {
    pub const MIN_DURATION_MS: u32 = 30;

    pub fn sudden() -> Self {
        Transition {
            effect: Effect::Sudden,
            duration_ms: Self::MIN_DURATION_MS,
        }
    }

    /// Returns `None` if the duration is below 30 ms.
    ///
    /// # Examples
    ///
    /// ```
    /// use yeelight_rs::{Effect, Transition};
    ///
    /// assert!(Transition::smooth(29).is_none());
    /// let fade = Transition::smooth(500).unwrap();
    /// assert_eq!(fade.effect(), Effect::Smooth);
    /// assert_eq!(fade.duration_ms(), 500);
    /// ```
    pub fn smooth(duration_ms: u32) -> Option<Self> {
        Self::create(Effect::Smooth, duration_ms)
    }

    pub fn create(effect: Effect, duration_ms: u32) -> Option<Self> {
        if duration_ms >= Self::MIN_DURATION_MS {
            Some(Transition {
                effect,
                duration_ms,
            })
        } else {
            None
        }
    }

    pub fn effect(&self) -> Effect {
        self.effect
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }
}

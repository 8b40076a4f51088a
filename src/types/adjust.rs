//! Relative adjustments, used by controllers that don't know the current value.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Direction of an adjustment.
#[derive(
    Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AdjustAction {
    Increase,
    Decrease,
    /// Increase, wrapping to the minimum after the maximum.
    Circle,
}

/// Property an adjustment applies to.
#[derive(
    Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, AsRefStr, Display, EnumString,
)]
pub enum AdjustProperty {
    #[serde(rename = "bright")]
    #[strum(serialize = "bright")]
    Brightness,
    #[serde(rename = "ct")]
    #[strum(serialize = "ct")]
    ColorTemperature,
    /// Only accepts [`AdjustAction::Circle`].
    #[serde(rename = "color")]
    #[strum(serialize = "color")]
    Color,
}

impl AdjustProperty {
    pub fn accepts(&self, action: AdjustAction) -> bool {
        !matches!(self, AdjustProperty::Color) || action == AdjustAction::Circle
    }
}

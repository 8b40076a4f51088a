//! Names of the properties a bulb reports through `get_prop`.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// A property tracked in the device state cache.
#[derive(
    Debug,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Property {
    Power,
    #[serde(rename = "bright")]
    #[strum(serialize = "bright")]
    Brightness,
    #[serde(rename = "ct")]
    #[strum(serialize = "ct")]
    ColorTemperature,
    #[serde(rename = "rgb")]
    #[strum(serialize = "rgb")]
    RgbColor,
    Hue,
    #[serde(rename = "sat")]
    #[strum(serialize = "sat")]
    Saturation,
    ColorMode,
    #[serde(rename = "flowing")]
    #[strum(serialize = "flowing")]
    Flow,
    #[serde(rename = "delayoff")]
    #[strum(serialize = "delayoff")]
    SleepRemaining,
    #[serde(rename = "flow_params")]
    #[strum(serialize = "flow_params")]
    FlowParameters,
    #[serde(rename = "music_on")]
    #[strum(serialize = "music_on")]
    MusicOn,
    Name,
}

//! Value types for light control parameters.

mod adjust;
mod brightness;
mod color;
mod effect;
mod hue_saturation;
mod kelvin;
mod power;
mod property;

pub use adjust::{AdjustAction, AdjustProperty};
pub use brightness::Brightness;
pub use color::Color;
pub use effect::{Effect, Transition};
pub use hue_saturation::HueSaturation;
pub use kelvin::Kelvin;
pub use power::PowerMode;
pub use property::Property;

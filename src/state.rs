//! Last-known property values of a bulb.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::IntoEnumIterator;

use crate::errors::Error;
use crate::types::{PowerMode, Property};

/// Cached property values, `Null` until fetched.
///
/// Values are kept as the bulb reports them from `get_prop`: every one is a
/// JSON string, numbers included (`"100"`, not `100`). Setters on
/// [`Bulb`](crate::Bulb) store the same decimal-string form.
///
/// Values are updated optimistically after commands succeed, so they can
/// drift from the bulb if another controller changes it. Only a refresh
/// brings them back in line.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use yeelight_rs::{DeviceState, PowerMode, Property};
///
/// let mut state = DeviceState::new();
/// assert!(state.get(Property::Power).is_null());
///
/// state
///     .apply(&[Property::Power, Property::Brightness], vec![json!("on"), json!("100")])
///     .unwrap();
/// assert_eq!(state.power(), Some(PowerMode::On));
/// assert_eq!(state.get(Property::Brightness), &json!("100"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceState {
    values: BTreeMap<Property, Value>,
}

impl Default for DeviceState {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceState {
    pub fn new() -> Self {
        DeviceState {
            values: Property::iter().map(|p| (p, Value::Null)).collect(),
        }
    }

    pub fn get(&self, property: Property) -> &Value {
        self.values.get(&property).unwrap_or(&Value::Null)
    }

    pub fn set(&mut self, property: Property, value: impl Into<Value>) {
        self.values.insert(property, value.into());
    }

    /// Assign `values` to `names` by position, as returned by `get_prop`.
    ///
    /// Nothing is changed if the lengths differ.
    pub fn apply(&mut self, names: &[Property], values: Vec<Value>) -> Result<(), Error> {
        if names.len() != values.len() {
            return Err(Error::malformed(format!(
                "requested {} properties but received {} values",
                names.len(),
                values.len()
            )));
        }
        for (name, value) in names.iter().zip(values) {
            self.values.insert(*name, value);
        }
        Ok(())
    }

    /// Cached power state; `None` if never fetched or unrecognised.
    pub fn power(&self) -> Option<PowerMode> {
        self.get(Property::Power)
            .as_str()
            .and_then(|s| PowerMode::from_str(s).ok())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Property, &Value)> {
        self.values.iter().map(|(p, v)| (*p, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_state_is_unknown() {
        let state = DeviceState::new();
        assert_eq!(state.iter().count(), Property::iter().count());
        assert!(state.iter().all(|(_, v)| v.is_null()));
        assert_eq!(state.power(), None);
    }

    #[test]
    fn test_apply_length_mismatch_leaves_state() {
        let mut state = DeviceState::new();
        let err = state
            .apply(&[Property::Power, Property::Brightness], vec![json!("on")])
            .unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
        assert!(state.get(Property::Power).is_null());
    }

    #[test]
    fn test_set_overwrites() {
        let mut state = DeviceState::new();
        state.set(Property::Power, "off");
        assert_eq!(state.power(), Some(PowerMode::Off));
        state.set(Property::Power, "on");
        assert_eq!(state.power(), Some(PowerMode::On));
        state.set(Property::RgbColor, 255.to_string());
        assert_eq!(state.get(Property::RgbColor), &json!("255"));
    }
}

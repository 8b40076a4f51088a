//! Individual bulb control.

use std::net::IpAddr;

use log::debug;
use serde_json::Value;
use strum::IntoEnumIterator;

use crate::errors::Error;
use crate::message::Param;
use crate::state::DeviceState;
use crate::transport::Transport;
use crate::types::{
    AdjustAction, AdjustProperty, Brightness, Color, HueSaturation, Kelvin, PowerMode, Property,
    Transition,
};

type Result<T> = std::result::Result<T, Error>;

/// Represents a single Yeelight bulb.
///
/// A `Bulb` validates inputs through its typed arguments, refuses commands
/// that need the light on when its cached state says it is off, and keeps a
/// [`DeviceState`] cache of the bulb's properties. The cache starts empty;
/// call [`Bulb::refresh`] (or use [`Bulb::connect`]) to fill it.
///
/// # Example
///
/// ```
/// use std::net::{IpAddr, Ipv4Addr};
/// use yeelight_rs::{Bulb, Property};
///
/// let bulb = Bulb::new(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 100)));
/// assert_eq!(bulb.transport().addr(), "192.168.1.100:55443");
/// assert!(bulb.property(Property::Power).is_null());
/// assert!(!bulb.is_on() && !bulb.is_off());
/// ```
#[derive(Debug, Clone)]
pub struct Bulb {
    transport: Transport,
    state: DeviceState,
}

impl Bulb {
    pub fn new(ip: IpAddr) -> Self {
        Self::with_transport(Transport::new(&ip.to_string(), Transport::DEFAULT_PORT))
    }

    pub fn with_transport(transport: Transport) -> Self {
        Bulb {
            transport,
            state: DeviceState::new(),
        }
    }

    /// Create a bulb and fetch all of its properties.
    pub async fn connect(ip: IpAddr) -> Result<Self> {
        let mut bulb = Self::new(ip);
        bulb.refresh().await?;
        Ok(bulb)
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    pub fn property(&self, property: Property) -> &Value {
        self.state.get(property)
    }

    pub fn is_on(&self) -> bool {
        self.state.power() == Some(PowerMode::On)
    }

    pub fn is_off(&self) -> bool {
        self.state.power() == Some(PowerMode::Off)
    }

    /// Send a raw command; the cache is left untouched.
    pub async fn invoke(&self, method: &str, params: Vec<Param>) -> Result<Vec<Value>> {
        self.transport.invoke(method, params).await
    }

    /// Query every tracked property and replace the cache with the answer.
    pub async fn refresh(&mut self) -> Result<&DeviceState> {
        let names: Vec<Property> = Property::iter().collect();
        let params = names.iter().map(|p| Param::from(p.as_ref())).collect();
        let values = self.transport.invoke("get_prop", params).await?;
        self.state.apply(&names, values)?;
        debug!("refreshed {}: {:?}", self.transport.addr(), self.state);
        Ok(&self.state)
    }

    pub async fn set_color_temperature(
        &mut self,
        temperature: Kelvin,
        transition: Transition,
    ) -> Result<()> {
        self.ensure_on("set_color_temperature")?;
        let mut params = vec![Param::from(temperature.kelvin())];
        params.extend(transition_params(&transition));
        self.transport.invoke("set_ct_abx", params).await?;
        self.state
            .set(Property::ColorTemperature, temperature.kelvin().to_string());
        Ok(())
    }

    pub async fn set_rgb_color(&mut self, color: Color, transition: Transition) -> Result<()> {
        self.ensure_on("set_rgb_color")?;
        let mut params = vec![Param::from(color.packed())];
        params.extend(transition_params(&transition));
        self.transport.invoke("set_rgb", params).await?;
        self.state.set(Property::RgbColor, color.packed().to_string());
        Ok(())
    }

    pub async fn set_hsv_color(&mut self, hs: HueSaturation, transition: Transition) -> Result<()> {
        self.ensure_on("set_hsv_color")?;
        let mut params = vec![Param::from(hs.hue()), Param::from(hs.saturation())];
        params.extend(transition_params(&transition));
        self.transport.invoke("set_hsv", params).await?;
        self.state.set(Property::Hue, hs.hue().to_string());
        self.state.set(Property::Saturation, hs.saturation().to_string());
        Ok(())
    }

    pub async fn set_brightness(
        &mut self,
        brightness: Brightness,
        transition: Transition,
    ) -> Result<()> {
        self.ensure_on("set_brightness")?;
        let mut params = vec![Param::from(brightness.value())];
        params.extend(transition_params(&transition));
        self.transport.invoke("set_bright", params).await?;
        self.state.set(Property::Brightness, brightness.value().to_string());
        Ok(())
    }

    /// Switch the light on; does nothing if the cache already says on.
    pub async fn turn_on(&mut self, transition: Transition) -> Result<()> {
        self.set_power(PowerMode::On, transition).await
    }

    /// Switch the light off; does nothing if the cache already says off.
    pub async fn turn_off(&mut self, transition: Transition) -> Result<()> {
        self.set_power(PowerMode::Off, transition).await
    }

    pub async fn set_power(&mut self, power: PowerMode, transition: Transition) -> Result<()> {
        if self.state.power() == Some(power) {
            return Ok(());
        }
        let mut params = vec![Param::from(power.as_ref())];
        params.extend(transition_params(&transition));
        self.transport.invoke("set_power", params).await?;
        self.state.set(Property::Power, power.as_ref());
        Ok(())
    }

    /// Flip the power state without needing to know it.
    pub async fn toggle(&mut self) -> Result<()> {
        self.transport.invoke("toggle", Vec::new()).await?;
        if let Some(power) = self.state.power() {
            self.state.set(Property::Power, power.flipped().as_ref());
        }
        Ok(())
    }

    /// Persist the current state as the bulb's power-on default.
    pub async fn save_state(&mut self) -> Result<()> {
        self.ensure_on("save_state")?;
        self.transport.invoke("set_default", Vec::new()).await?;
        Ok(())
    }

    /// Step brightness, color temperature or color, then re-read the cache.
    pub async fn adjust(&mut self, action: AdjustAction, property: AdjustProperty) -> Result<()> {
        if !property.accepts(action) {
            return Err(Error::InvalidAdjust {
                action: action.to_string(),
                property: property.to_string(),
            });
        }
        let params = vec![Param::from(action.as_ref()), Param::from(property.as_ref())];
        self.transport.invoke("set_adjust", params).await?;
        // The new value is unknown until read back
        self.refresh().await?;
        Ok(())
    }

    fn ensure_on(&self, operation: &'static str) -> Result<()> {
        if self.is_off() {
            return Err(Error::BulbOff { operation });
        }
        Ok(())
    }
}

fn transition_params(transition: &Transition) -> [Param; 2] {
    [
        Param::from(transition.effect().as_ref()),
        Param::from(transition.duration_ms()),
    ]
}

//! # yeelight_rs
//!
//! An async Rust library for controlling Yeelight smart bulbs over their LAN
//! control protocol.
//!
//! Every command is a single line of JSON sent over its own TCP connection
//! (port 55443). The bulb answers with a line carrying the same `id` and
//! either a `result` array or an `error` object. This crate builds those
//! lines, matches answers to commands, and turns bulb-reported errors into
//! [`Error::Protocol`].
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::net::IpAddr;
//! use yeelight_rs::{Bulb, Color, Transition};
//!
//! // Works with any async runtime!
//! async fn control_bulb() -> Result<(), Box<dyn std::error::Error>> {
//!     let ip: IpAddr = "192.168.1.100".parse()?;
//!     let mut bulb = Bulb::connect(ip).await?;
//!
//!     bulb.turn_on(Transition::sudden()).await?;
//!     bulb.set_rgb_color(Color::rgb(0, 0, 255), Transition::smooth(500).unwrap())
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Layers
//!
//! - [`Command`] and [`decode`]: the wire format, with no I/O
//! - [`Transport`]: one connection per [`Transport::invoke`], id matching
//! - [`Bulb`]: typed setters, client-side preconditions and a [`DeviceState`] cache
//!
//! ## Runtime Selection
//!
//! This library is runtime-agnostic. Select your preferred runtime using feature flags:
//!
//! - `runtime-tokio` (default): Use the tokio async runtime
//! - `runtime-async-std`: Use the async-std runtime
//! - `runtime-smol`: Use the smol runtime
//!
//! ```toml
//! [dependencies]
//! yeelight-rs = { version = "0.1", default-features = false, features = ["runtime-smol"] }
//! ```

mod bulb;
mod errors;
mod history;
mod ids;
mod message;
pub mod runtime;
mod state;
mod transport;
mod types;

// Re-export public API
pub use bulb::Bulb;
pub use errors::Error;
pub use history::{HistoryEntry, HistorySummary, MessageHistory, MessageType};
pub use ids::{IdGenerator, RandomIds, SequentialIds};
pub use message::{Command, Param, decode};
pub use state::DeviceState;
pub use transport::{Transport, TransportConfig};
pub use types::{
    AdjustAction, AdjustProperty, Brightness, Color, Effect, HueSaturation, Kelvin, PowerMode,
    Property, Transition,
};

//! Wire encoding of commands and decoding of bulb responses.
//!
//! A command travels as a single line of JSON terminated by CRLF:
//!
//! ```text
//! {"id":1,"method":"set_power","params":["on", "smooth", 500]}\r\n
//! ```
//!
//! The bulb's parser is strict about this shape, so commands are rendered
//! textually rather than through a generic JSON serializer.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::Error;

type Result<T> = std::result::Result<T, Error>;

/// A single positional command parameter.
///
/// Integers are sent as bare numbers, everything else as a quoted string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Param {
    Int(i64),
    Str(String),
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Int(value) => write!(f, "{value}"),
            // Value's Display yields an escaped JSON string literal
            Param::Str(value) => write!(f, "{}", Value::from(value.as_str())),
        }
    }
}

macro_rules! param_from_int {
    { $( $t:ty ),* } => {
        $(
            impl From<$t> for Param {
                fn from(value: $t) -> Self {
                    Param::Int(i64::from(value))
                }
            }
        )*
    }
}

param_from_int! { u8, u16, u32, i8, i16, i32, i64 }

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Param::Str(value.to_string())
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Param::Str(value)
    }
}

/// A command addressed to a bulb.
///
/// The identifier is fixed at construction; the bulb echoes it back in its
/// response so the two can be matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    id: u16,
    method: String,
    params: Vec<Param>,
}

impl Command {
    pub fn new(id: u16, method: &str, params: Vec<Param>) -> Self {
        Command {
            id,
            method: method.to_string(),
            params,
        }
    }

    pub fn id(&self) -> u16 {
        self.id
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Render the command as a CRLF-terminated wire line.
    ///
    /// # Examples
    ///
    /// ```
    /// use yeelight_rs::{Command, Param};
    ///
    /// let cmd = Command::new(7, "set_bright", vec![Param::from(50), Param::from("smooth"), Param::from(500)]);
    /// assert_eq!(
    ///     cmd.encode(),
    ///     "{\"id\":7,\"method\":\"set_bright\",\"params\":[50, \"smooth\", 500]}\r\n"
    /// );
    ///
    /// let toggle = Command::new(8, "toggle", Vec::new());
    /// assert_eq!(toggle.encode(), "{\"id\":8,\"method\":\"toggle\",\"params\":[]}\r\n");
    /// ```
    pub fn encode(&self) -> String {
        format!(
            "{{\"id\":{},\"method\":{},\"params\":[{}]}}\r\n",
            self.id,
            Value::from(self.method.as_str()),
            join_params(&self.params)
        )
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}) [id {}]",
            self.method,
            join_params(&self.params),
            self.id
        )
    }
}

fn join_params(params: &[Param]) -> String {
    params
        .iter()
        .map(Param::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Error object reported by the bulb.
#[derive(Debug, Deserialize)]
struct DeviceError {
    code: i64,
    message: String,
}

/// Decode a raw response frame for `command`.
///
/// Only the first line of `raw` is considered. Returns the `result` array on
/// success; a response for another identifier, an `error` object, or anything
/// that is not a well-formed response is turned into the matching [`Error`].
pub fn decode(raw: &[u8], command: &Command) -> Result<Vec<Value>> {
    let frame = first_line(raw);
    let data: Value = serde_json::from_slice(frame)
        .map_err(|e| Error::malformed(format!("invalid json: {e}")))?;
    let Value::Object(mut obj) = data else {
        return Err(Error::malformed("response is not a json object"));
    };

    let received = obj
        .get("id")
        .and_then(Value::as_u64)
        .ok_or_else(|| Error::malformed("response has no integer id"))?;
    if received != u64::from(command.id()) {
        return Err(Error::Mismatch {
            expected: command.id(),
            received,
        });
    }

    if let Some(result) = obj.remove("result") {
        return match result {
            Value::Array(values) => Ok(values),
            other => Err(Error::malformed(format!("result is not an array: {other}"))),
        };
    }

    if let Some(error) = obj.remove("error") {
        return Err(device_error(error, command));
    }

    Err(Error::malformed(format!(
        "response has neither result nor error: {}",
        Value::Object(obj)
    )))
}

fn device_error(error: Value, command: &Command) -> Error {
    match serde_json::from_value::<DeviceError>(error) {
        Ok(DeviceError { code, message }) => Error::Protocol {
            code,
            message,
            command: command.to_string(),
        },
        Err(e) => Error::malformed(format!("invalid error object: {e}")),
    }
}

fn first_line(raw: &[u8]) -> &[u8] {
    let end = raw.iter().position(|&b| b == b'\n').unwrap_or(raw.len());
    raw[..end].trim_ascii()
}

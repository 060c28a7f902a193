// devices/mod.rs
mod kasa;
mod protocol;

pub use kasa::KasaBulb;

use crate::color::Hsv;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("socket {action} error: {err}")]
    Socket {
        action: &'static str,
        #[source]
        err: std::io::Error,
    },
    #[error("failed to encode command: {0}")]
    JsonDump(serde_json::Error),
    #[error("failed to decode response: {0}")]
    JsonLoad(serde_json::Error),
    #[error("missing {0} in response")]
    MissingField(&'static str),
    #[error("device returned err_code {code}: {message}")]
    Rejected { code: i64, message: String },
}

impl DeviceError {
    pub fn socket(action: &'static str, err: std::io::Error) -> Self {
        DeviceError::Socket { action, err }
    }
}

/// Last known state of a bulb. Only updated from device replies, so it can
/// lag behind the physical bulb.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulbState {
    pub on: bool,
    pub brightness: Option<u8>,
    pub hue: Option<u16>,
    pub saturation: Option<u8>,
    pub color_temp: Option<u16>,
}

/// A single network bulb. Every call is one attempt with no retry.
#[async_trait::async_trait]
pub trait Bulb: Send + Sync {
    fn host(&self) -> &str;
    /// Cached power state, no network round-trip.
    async fn is_on(&self) -> bool;
    async fn state(&self) -> BulbState;
    async fn refresh(&self) -> Result<(), DeviceError>;
    async fn turn_on(&self) -> Result<(), DeviceError>;
    async fn turn_off(&self) -> Result<(), DeviceError>;
    async fn set_brightness(&self, level: u8) -> Result<(), DeviceError>;
    async fn set_hsv(&self, hsv: Hsv) -> Result<(), DeviceError>;
    async fn set_color_temp(&self, kelvin: u16) -> Result<(), DeviceError>;
}

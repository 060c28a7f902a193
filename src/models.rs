use crate::{error::AppError, fleet::Fleet, motion::MotionFlag};
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;

pub const BRIGHTNESS_RANGE: (u8, u8) = (1, 100);
pub const KELVIN_RANGE: (u16, u16) = (2500, 6500);

pub struct AppState {
    pub fleet: Arc<Fleet>,
    pub motion: MotionFlag,
}

impl AppState {
    pub fn new(fleet: Arc<Fleet>, motion: MotionFlag) -> Self {
        Self { fleet, motion }
    }
}

#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    pub state: Option<String>,
}

impl ToggleForm {
    /// Only an explicit "on" powers the fleet up.
    pub fn power(&self) -> bool {
        self.state.as_deref() == Some("on")
    }
}

#[derive(Debug, Deserialize)]
pub struct BrightnessForm {
    pub level: Option<String>,
}

impl BrightnessForm {
    pub fn level(&self) -> Result<u8, AppError> {
        let level: i64 = parse_field("level", self.level.as_deref())?;
        let (min, max) = BRIGHTNESS_RANGE;
        Ok(level.clamp(i64::from(min), i64::from(max)) as u8)
    }
}

#[derive(Debug, Deserialize)]
pub struct ColorForm {
    pub hex_color: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TemperatureForm {
    pub temp: Option<String>,
}

impl TemperatureForm {
    pub fn kelvin(&self) -> Result<u16, AppError> {
        let temp: i64 = parse_field("temp", self.temp.as_deref())?;
        let (min, max) = KELVIN_RANGE;
        Ok(temp.clamp(i64::from(min), i64::from(max)) as u16)
    }
}

fn parse_field<T: FromStr>(field: &'static str, value: Option<&str>) -> Result<T, AppError> {
    let value = value.ok_or(AppError::MissingField(field))?;
    value.trim().parse().map_err(|_| AppError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

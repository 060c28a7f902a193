// commands/mod.rs
use crate::{
    color::Hsv,
    devices::{Bulb, DeviceError},
};

/// One logical operation applied to every bulb of the fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FleetCommand {
    Refresh,
    Power(bool),
    Brightness(u8),
    Color(Hsv),
    Temperature(u16),
}

impl FleetCommand {
    pub fn name(&self) -> &'static str {
        match self {
            FleetCommand::Refresh => "refresh",
            FleetCommand::Power(_) => "power",
            FleetCommand::Brightness(_) => "brightness",
            FleetCommand::Color(_) => "color",
            FleetCommand::Temperature(_) => "temperature",
        }
    }

    pub async fn execute(&self, bulb: &dyn Bulb) -> Result<(), DeviceError> {
        match *self {
            FleetCommand::Refresh => bulb.refresh().await,
            FleetCommand::Power(true) => bulb.turn_on().await,
            FleetCommand::Power(false) => bulb.turn_off().await,
            FleetCommand::Brightness(level) => {
                ensure_on(bulb).await?;
                bulb.set_brightness(level).await
            }
            FleetCommand::Color(hsv) => {
                ensure_on(bulb).await?;
                bulb.set_hsv(hsv).await
            }
            FleetCommand::Temperature(kelvin) => {
                ensure_on(bulb).await?;
                bulb.set_color_temp(kelvin).await
            }
        }
    }
}

// Settings sent to a bulb that is off are ignored, so power it first.
async fn ensure_on(bulb: &dyn Bulb) -> Result<(), DeviceError> {
    if !bulb.is_on().await {
        bulb.turn_on().await?;
    }
    Ok(())
}

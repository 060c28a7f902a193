// motion/mod.rs
mod sensor;

pub use sensor::{MotionSensor, SensorError, SysfsMotionSensor};

use crate::fleet::Fleet;
use metrics::gauge;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{info, warn};

/// Read side of the motion flag: true while a hold cycle is running.
#[derive(Debug, Clone)]
pub struct MotionFlag(watch::Receiver<bool>);

impl MotionFlag {
    pub fn is_active(&self) -> bool {
        *self.0.borrow()
    }
}

/// Polls the sensor and keeps the fleet on for a fixed hold after motion.
///
/// The loop is the only writer of the motion flag. Motion seen during a hold
/// does not extend it.
pub struct MotionWatch<S> {
    sensor: S,
    fleet: Arc<Fleet>,
    active: watch::Sender<bool>,
    poll_interval: Duration,
    hold: Duration,
}

impl<S: MotionSensor> MotionWatch<S> {
    pub fn new(
        sensor: S,
        fleet: Arc<Fleet>,
        poll_interval: Duration,
        hold: Duration,
    ) -> (Self, MotionFlag) {
        let (active, flag) = watch::channel(false);
        let watch = Self {
            sensor,
            fleet,
            active,
            poll_interval,
            hold,
        };
        (watch, MotionFlag(flag))
    }

    /// Never returns; stop it by aborting the task.
    pub async fn run(self) {
        info!(poll = ?self.poll_interval, hold = ?self.hold, "Motion watch started");
        loop {
            self.poll().await;
            sleep(self.poll_interval).await;
        }
    }

    async fn poll(&self) {
        let detected = match self.sensor.is_active().await {
            Ok(detected) => detected,
            Err(e) => {
                warn!("Sensor read failed: {}", e);
                false
            }
        };

        if detected && !self.is_active() {
            self.hold_cycle().await;
        }
    }

    async fn hold_cycle(&self) {
        info!("Motion detected, lights on");
        self.set_active(true);
        self.fleet.set_power(true).await;

        sleep(self.hold).await;

        info!("Hold expired, lights off");
        self.fleet.set_power(false).await;
        self.set_active(false);
    }

    fn is_active(&self) -> bool {
        *self.active.borrow()
    }

    fn set_active(&self, active: bool) {
        self.active.send_replace(active);
        gauge!("motion_active").set(if active { 1.0 } else { 0.0 });
    }
}

// motion/sensor.rs
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::info;

#[derive(Error, Debug)]
pub enum SensorError {
    #[error("gpio {}: {err}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        err: io::Error,
    },
    #[error("unexpected gpio value {0:?}")]
    UnexpectedValue(String),
}

impl SensorError {
    fn io(path: &Path, err: io::Error) -> Self {
        SensorError::Io {
            path: path.to_path_buf(),
            err,
        }
    }
}

/// A binary presence input, polled by the watch loop.
#[async_trait]
pub trait MotionSensor: Send + Sync {
    async fn is_active(&self) -> Result<bool, SensorError>;
}

/// PIR sensor wired to a GPIO line exposed through the sysfs interface.
pub struct SysfsMotionSensor {
    value_path: PathBuf,
}

impl SysfsMotionSensor {
    /// Exports `pin` (BCM numbering) under `root` if needed and configures it
    /// as an input.
    pub async fn export(root: impl AsRef<Path>, pin: u32) -> Result<Self, SensorError> {
        let root = root.as_ref();
        let pin_dir = root.join(format!("gpio{pin}"));

        let exported = fs::try_exists(&pin_dir)
            .await
            .map_err(|e| SensorError::io(&pin_dir, e))?;
        if !exported {
            let export = root.join("export");
            fs::write(&export, pin.to_string())
                .await
                .map_err(|e| SensorError::io(&export, e))?;
        }

        let direction = pin_dir.join("direction");
        fs::write(&direction, "in")
            .await
            .map_err(|e| SensorError::io(&direction, e))?;

        info!(pin, path = %pin_dir.display(), "GPIO input ready");
        Ok(Self {
            value_path: pin_dir.join("value"),
        })
    }
}

#[async_trait]
impl MotionSensor for SysfsMotionSensor {
    async fn is_active(&self) -> Result<bool, SensorError> {
        let raw = fs::read_to_string(&self.value_path)
            .await
            .map_err(|e| SensorError::io(&self.value_path, e))?;
        match raw.trim() {
            "1" => Ok(true),
            "0" => Ok(false),
            other => Err(SensorError::UnexpectedValue(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn gpio_root(name: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!(
            "motion-lights-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&root).await;
        fs::create_dir_all(&root).await.unwrap();
        root
    }

    #[tokio::test]
    async fn reads_exported_pin() {
        let root = gpio_root("exported").await;
        fs::create_dir(root.join("gpio17")).await.unwrap();
        fs::write(root.join("gpio17/value"), "1\n").await.unwrap();

        let sensor = SysfsMotionSensor::export(&root, 17).await.unwrap();
        assert_eq!(
            fs::read_to_string(root.join("gpio17/direction")).await.unwrap(),
            "in"
        );
        assert!(!fs::try_exists(root.join("export")).await.unwrap());
        assert!(sensor.is_active().await.unwrap());

        fs::write(root.join("gpio17/value"), "0\n").await.unwrap();
        assert!(!sensor.is_active().await.unwrap());

        fs::write(root.join("gpio17/value"), "x").await.unwrap();
        assert!(matches!(
            sensor.is_active().await,
            Err(SensorError::UnexpectedValue(_))
        ));

        fs::remove_dir_all(&root).await.unwrap();
    }

    #[tokio::test]
    async fn exports_missing_pin() {
        let root = gpio_root("missing").await;

        // no kernel behind the fake root, so the pin directory never appears
        let err = SysfsMotionSensor::export(&root, 4).await.err().unwrap();
        assert!(matches!(err, SensorError::Io { ref path, .. } if path.ends_with("gpio4/direction")));
        assert_eq!(fs::read_to_string(root.join("export")).await.unwrap(), "4");

        fs::remove_dir_all(&root).await.unwrap();
    }
}

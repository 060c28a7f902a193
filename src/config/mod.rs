// config/mod.rs
use config::Config;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub sensor: SensorSettings,
    pub bulbs: BulbSettings,
    pub metrics: MetricsSettings,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub address: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SensorSettings {
    /// BCM pin number of the PIR output.
    pub pin: u32,
    pub gpio_root: String,
    pub poll_interval_ms: u64,
    pub hold_secs: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BulbSettings {
    pub addresses: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MetricsSettings {
    pub enabled: bool,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            address: "0.0.0.0:5000".to_string(),
        }
    }
}

impl Default for SensorSettings {
    fn default() -> Self {
        Self {
            pin: 17,
            gpio_root: "/sys/class/gpio".to_string(),
            poll_interval_ms: 100,
            hold_secs: 20,
        }
    }
}

impl SensorSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn hold(&self) -> Duration {
        Duration::from_secs(self.hold_secs)
    }
}

impl Default for BulbSettings {
    fn default() -> Self {
        Self {
            addresses: vec!["192.168.1.33".to_string(), "192.168.1.36".to_string()],
        }
    }
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            port: 9000,
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, config::ConfigError> {
        Self::load(Self::environment())
    }

    /// `APP_SERVER__ADDRESS`, `APP_BULBS__ADDRESSES=a,b`, ...
    fn environment() -> config::Environment {
        config::Environment::with_prefix("APP")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("bulbs.addresses")
    }

    fn load(environment: config::Environment) -> Result<Self, config::ConfigError> {
        let settings: Settings = Config::builder()
            .add_source(config::File::with_name("config/config").required(false))
            .add_source(environment)
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.sensor.poll_interval_ms == 0 {
            return Err(config::ConfigError::Message(
                "sensor.poll_interval_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

// kasa.rs
use super::{Bulb, BulbState, DeviceError, protocol};
use crate::color::Hsv;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio::sync::RwLock;
use tracing::debug;

const LIGHTING_SERVICE: &str = "smartlife.iot.smartbulb.lightingservice";

/// TP-Link Kasa bulb reachable over the local TCP protocol.
pub struct KasaBulb {
    host: String,
    port: u16,
    state: RwLock<BulbState>,
}

impl KasaBulb {
    const PORT: u16 = 9999;

    pub fn new(host: impl Into<String>) -> Self {
        Self::with_port(host, Self::PORT)
    }

    pub fn with_port(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            state: RwLock::new(BulbState::default()),
        }
    }

    async fn send_command(&self, command: &Value) -> Result<Value, DeviceError> {
        let request = serde_json::to_vec(command).map_err(DeviceError::JsonDump)?;
        debug!(host = %self.host, %command, "sending");

        let mut stream = TcpStream::connect((self.host.as_str(), self.port))
            .await
            .map_err(|e| DeviceError::socket("connect", e))?;
        protocol::write_frame(&mut stream, &request)
            .await
            .map_err(|e| DeviceError::socket("send", e))?;
        let response = protocol::read_frame(&mut stream)
            .await
            .map_err(|e| DeviceError::socket("receive", e))?;

        serde_json::from_slice(&response).map_err(DeviceError::JsonLoad)
    }

    async fn transition(&self, params: Value) -> Result<(), DeviceError> {
        let response = self
            .send_command(&json!({ LIGHTING_SERVICE: { "transition_light_state": params } }))
            .await?;
        let reply = response
            .get(LIGHTING_SERVICE)
            .and_then(|service| service.get("transition_light_state"))
            .ok_or(DeviceError::MissingField("transition_light_state"))?;
        check_err_code(reply)?;

        let light = KasaLightState::deserialize(reply).map_err(DeviceError::JsonLoad)?;
        light.apply_to(&mut *self.state.write().await);
        Ok(())
    }

    // Any change that isn't a pure power switch must not fall back to the
    // bulb's default on-state.
    async fn adjust(&self, mut params: Value) -> Result<(), DeviceError> {
        params["ignore_default"] = json!(1);
        self.transition(params).await
    }
}

#[async_trait]
impl Bulb for KasaBulb {
    fn host(&self) -> &str {
        &self.host
    }

    async fn is_on(&self) -> bool {
        self.state.read().await.on
    }

    async fn state(&self) -> BulbState {
        self.state.read().await.clone()
    }

    async fn refresh(&self) -> Result<(), DeviceError> {
        let response = self
            .send_command(&json!({ "system": { "get_sysinfo": {} } }))
            .await?;
        let sysinfo = response
            .get("system")
            .and_then(|system| system.get("get_sysinfo"))
            .ok_or(DeviceError::MissingField("get_sysinfo"))?;
        check_err_code(sysinfo)?;

        let light = sysinfo
            .get("light_state")
            .ok_or(DeviceError::MissingField("light_state"))?;
        let light = KasaLightState::deserialize(light).map_err(DeviceError::JsonLoad)?;
        light.apply_to(&mut *self.state.write().await);
        Ok(())
    }

    async fn turn_on(&self) -> Result<(), DeviceError> {
        self.transition(json!({ "on_off": 1 })).await
    }

    async fn turn_off(&self) -> Result<(), DeviceError> {
        self.transition(json!({ "on_off": 0 })).await
    }

    async fn set_brightness(&self, level: u8) -> Result<(), DeviceError> {
        self.adjust(json!({ "brightness": level })).await
    }

    async fn set_hsv(&self, hsv: Hsv) -> Result<(), DeviceError> {
        self.adjust(json!({
            "hue": hsv.hue,
            "saturation": hsv.saturation,
            "color_temp": 0,
            "brightness": hsv.value,
        }))
        .await
    }

    async fn set_color_temp(&self, kelvin: u16) -> Result<(), DeviceError> {
        self.adjust(json!({ "color_temp": kelvin })).await
    }
}

fn check_err_code(reply: &Value) -> Result<(), DeviceError> {
    match reply.get("err_code").and_then(Value::as_i64) {
        Some(code) if code != 0 => Err(DeviceError::Rejected {
            code,
            message: reply
                .get("err_msg")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        }),
        _ => Ok(()),
    }
}

#[derive(Debug, Default, Deserialize)]
struct LightValues {
    hue: Option<u16>,
    saturation: Option<u8>,
    color_temp: Option<u16>,
    brightness: Option<u8>,
}

/// `light_state` as reported by the bulb. While off, the color values live
/// under `dft_on_state`.
#[derive(Debug, Default, Deserialize)]
struct KasaLightState {
    on_off: Option<u8>,
    #[serde(flatten)]
    values: LightValues,
    dft_on_state: Option<LightValues>,
}

impl KasaLightState {
    fn apply_to(&self, state: &mut BulbState) {
        if let Some(on_off) = self.on_off {
            state.on = on_off == 1;
        }
        for values in self.dft_on_state.iter().chain(Some(&self.values)) {
            if let Some(hue) = values.hue {
                state.hue = Some(hue);
            }
            if let Some(saturation) = values.saturation {
                state.saturation = Some(saturation);
            }
            if let Some(color_temp) = values.color_temp {
                state.color_temp = Some(color_temp);
            }
            if let Some(brightness) = values.brightness {
                state.brightness = Some(brightness);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    /// Accepts one connection, checks the decoded request, answers with `reply`.
    async fn fake_bulb(reply: Value) -> (u16, tokio::task::JoinHandle<Value>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = protocol::read_frame(&mut socket).await.unwrap();
            let body = serde_json::to_vec(&reply).unwrap();
            protocol::write_frame(&mut socket, &body).await.unwrap();
            serde_json::from_slice(&request).unwrap()
        });
        (port, handle)
    }

    fn transition_reply(state: Value) -> Value {
        json!({ LIGHTING_SERVICE: { "transition_light_state": state } })
    }

    #[tokio::test]
    async fn refresh_reads_default_state_while_off() {
        let (port, server) = fake_bulb(json!({
            "system": { "get_sysinfo": {
                "alias": "hall",
                "err_code": 0,
                "light_state": {
                    "on_off": 0,
                    "dft_on_state": {
                        "mode": "normal", "hue": 120, "saturation": 80,
                        "color_temp": 0, "brightness": 40
                    }
                }
            }}
        }))
        .await;

        let bulb = KasaBulb::with_port("127.0.0.1", port);
        bulb.refresh().await.unwrap();

        assert_eq!(
            server.await.unwrap(),
            json!({ "system": { "get_sysinfo": {} } })
        );
        assert_eq!(
            bulb.state().await,
            BulbState {
                on: false,
                brightness: Some(40),
                hue: Some(120),
                saturation: Some(80),
                color_temp: Some(0),
            }
        );
    }

    #[tokio::test]
    async fn turn_on_updates_cache_from_reply() {
        let (port, server) = fake_bulb(transition_reply(json!({
            "on_off": 1, "mode": "normal", "hue": 0, "saturation": 0,
            "color_temp": 2700, "brightness": 100, "err_code": 0
        })))
        .await;

        let bulb = KasaBulb::with_port("127.0.0.1", port);
        assert!(!bulb.is_on().await);
        bulb.turn_on().await.unwrap();

        assert_eq!(
            server.await.unwrap(),
            transition_reply(json!({ "on_off": 1 }))
        );
        assert!(bulb.is_on().await);
        assert_eq!(bulb.state().await.color_temp, Some(2700));
    }

    #[tokio::test]
    async fn color_leaves_white_mode() {
        let (port, server) = fake_bulb(transition_reply(json!({
            "on_off": 1, "hue": 240, "saturation": 100, "color_temp": 0,
            "brightness": 100, "err_code": 0
        })))
        .await;

        let bulb = KasaBulb::with_port("127.0.0.1", port);
        let blue = Hsv {
            hue: 240,
            saturation: 100,
            value: 100,
        };
        bulb.set_hsv(blue).await.unwrap();

        assert_eq!(
            server.await.unwrap(),
            transition_reply(json!({
                "hue": 240, "saturation": 100, "color_temp": 0,
                "brightness": 100, "ignore_default": 1
            }))
        );
        assert_eq!(bulb.state().await.hue, Some(240));
    }

    #[tokio::test]
    async fn values_are_sent_verbatim() {
        let (port, server) = fake_bulb(transition_reply(json!({ "err_code": 0 }))).await;

        let bulb = KasaBulb::with_port("127.0.0.1", port);
        bulb.set_color_temp(9000).await.unwrap();

        assert_eq!(
            server.await.unwrap(),
            transition_reply(json!({ "color_temp": 9000, "ignore_default": 1 }))
        );
    }

    #[tokio::test]
    async fn non_zero_err_code_is_rejected() {
        let (port, _server) = fake_bulb(transition_reply(json!({
            "err_code": -3, "err_msg": "invalid argument"
        })))
        .await;

        let bulb = KasaBulb::with_port("127.0.0.1", port);
        let err = bulb.set_brightness(150).await.unwrap_err();
        assert!(matches!(err, DeviceError::Rejected { code: -3, .. }));
    }

    #[tokio::test]
    async fn unreachable_bulb_is_a_socket_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let bulb = KasaBulb::with_port("127.0.0.1", port);
        let err = bulb.refresh().await.unwrap_err();
        assert!(matches!(err, DeviceError::Socket { action: "connect", .. }));
        assert_eq!(bulb.state().await, BulbState::default());
    }
}

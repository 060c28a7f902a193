// fleet/mod.rs
use crate::{
    color::Hsv,
    commands::FleetCommand,
    devices::{Bulb, KasaBulb},
};
use metrics::counter;
use std::sync::Arc;
use tracing::{debug, warn};

/// The fixed, ordered set of bulbs built at startup.
pub struct Fleet {
    bulbs: Vec<Arc<dyn Bulb>>,
}

impl Fleet {
    pub fn new(bulbs: Vec<Arc<dyn Bulb>>) -> Self {
        Self { bulbs }
    }

    pub fn kasa<S: AsRef<str>>(addresses: &[S]) -> Self {
        Self::new(
            addresses
                .iter()
                .map(|address| Arc::new(KasaBulb::new(address.as_ref())) as Arc<dyn Bulb>)
                .collect(),
        )
    }

    pub fn bulbs(&self) -> &[Arc<dyn Bulb>] {
        &self.bulbs
    }

    /// Runs `command` on every bulb in order, one at a time. A failing bulb
    /// is logged and skipped; the caller only learns that the sweep ran.
    pub async fn apply(&self, command: FleetCommand) {
        counter!("fleet_sweeps_total", "op" => command.name()).increment(1);

        for bulb in &self.bulbs {
            match command.execute(bulb.as_ref()).await {
                Ok(()) => debug!(host = bulb.host(), op = command.name(), "applied"),
                Err(e) => {
                    counter!("fleet_device_failures_total", "op" => command.name()).increment(1);
                    warn!(host = bulb.host(), op = command.name(), "{}", e);
                }
            }
        }
    }

    pub async fn refresh_all(&self) {
        self.apply(FleetCommand::Refresh).await;
    }

    pub async fn set_power(&self, on: bool) {
        self.apply(FleetCommand::Power(on)).await;
    }

    pub async fn set_brightness(&self, level: u8) {
        self.apply(FleetCommand::Brightness(level)).await;
    }

    pub async fn set_color(&self, hsv: Hsv) {
        self.apply(FleetCommand::Color(hsv)).await;
    }

    pub async fn set_color_temp(&self, kelvin: u16) {
        self.apply(FleetCommand::Temperature(kelvin)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::testing::{Call, FakeBulb, Journal};

    fn fleet(bulbs: Vec<FakeBulb>) -> Fleet {
        Fleet::new(
            bulbs
                .into_iter()
                .map(|bulb| Arc::new(bulb) as Arc<dyn Bulb>)
                .collect(),
        )
    }

    #[tokio::test]
    async fn one_failure_does_not_stop_the_sweep() {
        let journal = Journal::default();
        let fleet = fleet(vec![
            FakeBulb::new("a", &journal),
            FakeBulb::new("b", &journal).failing(),
            FakeBulb::new("c", &journal),
        ]);

        fleet.set_power(true).await;

        assert_eq!(
            journal.calls(),
            vec![
                ("a".to_string(), Call::On),
                ("b".to_string(), Call::On),
                ("c".to_string(), Call::On),
            ]
        );
        assert!(fleet.bulbs()[0].is_on().await);
        assert!(!fleet.bulbs()[1].is_on().await);
        assert!(fleet.bulbs()[2].is_on().await);
    }

    #[tokio::test]
    async fn bulbs_are_processed_in_order() {
        let journal = Journal::default();
        let fleet = fleet(vec![
            FakeBulb::new("a", &journal),
            FakeBulb::new("b", &journal).powered(true),
        ]);

        fleet.set_brightness(30).await;

        assert_eq!(
            journal.calls(),
            vec![
                ("a".to_string(), Call::On),
                ("a".to_string(), Call::Brightness(30)),
                ("b".to_string(), Call::Brightness(30)),
            ]
        );
    }

    #[tokio::test]
    async fn failing_bulb_still_gets_every_attempt() {
        let journal = Journal::default();
        let fleet = fleet(vec![
            FakeBulb::new("a", &journal).failing(),
            FakeBulb::new("b", &journal),
        ]);

        fleet.refresh_all().await;
        fleet.set_color_temp(6500).await;

        assert_eq!(journal.calls_for("a"), vec![Call::Refresh, Call::On]);
        assert_eq!(
            journal.calls_for("b"),
            vec![Call::Refresh, Call::On, Call::ColorTemp(6500)]
        );
    }

    #[test]
    fn kasa_fleet_keeps_address_order() {
        let fleet = Fleet::kasa(&["192.168.1.33", "192.168.1.36"]);
        let hosts: Vec<_> = fleet.bulbs().iter().map(|b| b.host()).collect();
        assert_eq!(hosts, vec!["192.168.1.33", "192.168.1.36"]);
    }
}

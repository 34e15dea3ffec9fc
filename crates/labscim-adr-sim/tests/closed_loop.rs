//! Closed-loop behaviour of the LabSCim handler driving a simulated device.

use labscim_adr::{AdrConfig, LabScimHandler};
use labscim_adr_sim::device::{summarize, DeviceProfile, SimDevice};
use labscim_adr_sim::scenario::{ChannelScenario, ChannelScenarioConfig};

fn run(cfg: ChannelScenarioConfig, profile: DeviceProfile) -> labscim_adr_sim::device::SimSummary {
    let frames = ChannelScenario::new(cfg).frames();
    let mut device = SimDevice::new(LabScimHandler::default(), profile);
    summarize(&device.run(&frames))
}

#[test]
fn same_seed_same_run() {
    let cfg = ChannelScenarioConfig {
        seed: 99,
        uplinks: 300,
        ..Default::default()
    };
    let a = run(cfg.clone(), DeviceProfile::default());
    let b = run(cfg, DeviceProfile::default());
    assert_eq!(a.delivered, b.delivered);
    assert_eq!(a.transmissions, b.transmissions);
    assert_eq!(a.final_state, b.final_state);
}

#[test]
fn strong_static_channel_saves_airtime() {
    let cfg = ChannelScenarioConfig {
        seed: 3,
        uplinks: 100,
        start_snr_db: 8.0,
        min_snr_db: 8.0,
        max_snr_db: 8.0,
        snr_step_db: 0.0,
        loss_percent: 0.0,
    };
    let summary = run(cfg, DeviceProfile::default());
    assert_eq!(summary.delivered, 100);
    let last = summary.final_state.unwrap();
    assert_eq!(last.dr, 5);
    assert!(last.tx_power_index > 0, "expected power to back off: {last:?}");
    assert_eq!(last.nb_trans, 1);
}

#[test]
fn adr_off_device_is_never_reconfigured() {
    let cfg = ChannelScenarioConfig {
        seed: 5,
        uplinks: 100,
        start_snr_db: 8.0,
        ..Default::default()
    };
    let profile = DeviceProfile {
        adr: false,
        dr: 1,
        tx_power_index: 2,
        nb_trans: 2,
        ..Default::default()
    };
    let frames = ChannelScenario::new(cfg).frames();
    let mut device = SimDevice::new(LabScimHandler::default(), profile);
    for outcome in device.run(&frames) {
        assert_eq!(outcome.next.dr, 1);
        assert_eq!(outcome.next.tx_power_index, 2);
        assert_eq!(outcome.next.nb_trans, 2);
    }
}

#[test]
fn lossy_channel_raises_nb_trans() {
    let cfg = ChannelScenarioConfig {
        seed: 11,
        uplinks: 200,
        start_snr_db: 5.0,
        min_snr_db: 5.0,
        max_snr_db: 5.0,
        snr_step_db: 0.0,
        loss_percent: 40.0,
    };
    let frames = ChannelScenario::new(cfg).frames();
    let mut device = SimDevice::new(LabScimHandler::default(), DeviceProfile::default());
    let outcomes = device.run(&frames);
    assert!(
        outcomes.iter().any(|o| o.next.nb_trans > 1),
        "40% per-copy loss should trigger extra transmissions"
    );
}

#[test]
fn every_decision_respects_bounds() {
    let handler = LabScimHandler::new(AdrConfig::default());
    let profile = DeviceProfile::default();
    let (max_dr, max_tx) = (profile.max_dr, profile.max_tx_power_index);
    let frames = ChannelScenario::new(ChannelScenarioConfig {
        seed: 2024,
        uplinks: 500,
        snr_step_db: 3.0,
        loss_percent: 15.0,
        ..Default::default()
    })
    .frames();
    let mut device = SimDevice::new(handler, profile);
    for outcome in device.run(&frames) {
        assert!(outcome.next.dr <= max_dr);
        assert!(outcome.next.tx_power_index <= max_tx);
        assert!((1..=3).contains(&outcome.next.nb_trans));
    }
}

#[test]
fn outcomes_serialize_as_json() {
    let frames = ChannelScenario::new(ChannelScenarioConfig {
        uplinks: 3,
        ..Default::default()
    })
    .frames();
    let mut device = SimDevice::new(LabScimHandler::default(), DeviceProfile::default());
    let outcomes = device.run(&frames);
    let json = serde_json::to_value(&outcomes[0]).unwrap();
    assert_eq!(json["f_cnt"], 0);
    assert!(json["next"]["dr"].is_number());
}

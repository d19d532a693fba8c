use std::sync::{Arc, Mutex};

use vigil_core::{
    AlarmKind, Channel, Command, DangerLevel, Frame, NodeIdentity, PingRecord, PowerLevel, RadioId,
    ReadingRecord,
};
use vigil_link::{
    CycleReason, LinkSession, LoopbackMedium, Role, SensorSample, SessionTimings, SignalFlags,
};
use vigil_master::display::{NodeView, Panel};
use vigil_master::Aggregator;

#[derive(Default, Clone)]
struct RecordingPanel {
    log: Arc<Mutex<PanelLog>>,
}

#[derive(Default)]
struct PanelLog {
    renders: Vec<NodeView>,
    notifications: Vec<String>,
}

impl Panel for RecordingPanel {
    fn render(&mut self, view: &NodeView) {
        self.log.lock().unwrap().renders.push(*view);
    }

    fn notify(&mut self, _view: &NodeView, message: &str) {
        self.log.lock().unwrap().notifications.push(message.into());
    }
}

fn reading(source: u8, co2: i16, humidity: f32, temp_c: f32) -> ReadingRecord {
    ReadingRecord {
        source_channel: Channel(81),
        source_radio: RadioId(source),
        co2_ppm: co2,
        humidity,
        temp_c,
        temp_f: temp_c * 9.0 / 5.0 + 32.0,
        motion_detected: false,
        audio_gate_open: false,
        command: PingRecord::quiet(Channel(81), RadioId::MASTER),
    }
}

#[test]
fn quiet_reading_renders_without_routines() {
    let panel = RecordingPanel::default();
    let mut aggregator = Aggregator::new(panel.clone());

    let triage = aggregator.ingest(reading(2, 500, 50.0, 25.0)).unwrap();
    assert_eq!(triage.alarm, AlarmKind::Co2Good);
    assert_eq!(triage.danger, DangerLevel::None);

    let log = panel.log.lock().unwrap();
    assert_eq!(log.renders.len(), 1);
    assert_eq!(log.renders[0].radio_id, RadioId(2));
    assert_eq!(log.renders[0].alarm, AlarmKind::Co2Good);
    assert!(log.notifications.is_empty(), "no motion/audio routine");
}

#[test]
fn motion_reading_triggers_intruder_routine() {
    let panel = RecordingPanel::default();
    let mut aggregator = Aggregator::new(panel.clone());

    let mut r = reading(1, 500, 50.0, 25.0);
    r.motion_detected = true;
    let triage = aggregator.ingest(r).unwrap();
    assert_eq!(triage.alarm, AlarmKind::Intruder);

    let log = panel.log.lock().unwrap();
    assert_eq!(log.notifications, vec!["motion detected".to_owned()]);
}

#[test]
fn master_profile_is_applied_over_sender_triage() {
    let panel = RecordingPanel::default();
    let mut aggregator = Aggregator::new(panel.clone());

    // 1700 ppm: the node-side triage in the embedded ping says nothing,
    // but the Master's own band classifies it as good air.
    let r = reading(3, 1700, 50.0, 25.0);
    let triage = aggregator.ingest(r).unwrap();
    assert_eq!(triage.alarm, AlarmKind::Co2Good);
}

#[test]
fn out_of_range_source_is_dropped() {
    let panel = RecordingPanel::default();
    let mut aggregator = Aggregator::new(panel.clone());

    assert!(aggregator.ingest(reading(0, 500, 50.0, 25.0)).is_none());
    assert!(aggregator.ingest(reading(6, 500, 50.0, 25.0)).is_none());

    let log = panel.log.lock().unwrap();
    assert!(log.renders.is_empty());
}

#[test]
fn registry_tracks_per_node_history() {
    let panel = RecordingPanel::default();
    let mut aggregator = Aggregator::new(panel.clone());

    aggregator.ingest(reading(1, 500, 50.0, 25.0));
    aggregator.ingest(reading(1, 600, 51.0, 25.5));
    aggregator.ingest(reading(4, 700, 40.0, 22.0));

    let status = aggregator.status_of(RadioId(1)).unwrap();
    assert_eq!(status.readings, 2);
    assert_eq!(status.last_reading.co2_ppm, 600);

    let ack = PingRecord {
        channel: Channel(81),
        target_id: RadioId(1),
        command: Command::Acknowledge,
        alarm_kind: AlarmKind::None,
        danger_level: DangerLevel::None,
    };
    aggregator.ingest_ack(&ack);
    assert_eq!(aggregator.status_of(RadioId(1)).unwrap().acks, 1);

    let ids: Vec<u8> = aggregator.statuses().iter().map(|(id, _)| id.0).collect();
    assert_eq!(ids, vec![1, 4], "status dump ordered by node id");
}

#[tokio::test]
async fn pushed_command_ack_is_credited_to_the_node() {
    let panel = RecordingPanel::default();
    let mut aggregator = Aggregator::new(panel.clone());

    let medium = LoopbackMedium::new();
    let mut master = LinkSession::new(
        medium.endpoint(),
        NodeIdentity::new(RadioId::MASTER, Channel(81), PowerLevel::Max),
        Role::Master,
        SignalFlags::new(),
        SessionTimings::default(),
    )
    .unwrap();
    let mut node = LinkSession::new(
        medium.endpoint(),
        NodeIdentity::new(RadioId(3), Channel(81), PowerLevel::High),
        Role::Node,
        SignalFlags::new(),
        SessionTimings::default(),
    )
    .unwrap();

    let sample = SensorSample {
        co2_ppm: 500,
        humidity: 50.0,
        temp_c: 25.0,
        temp_f: 77.0,
        motion_detected: false,
        audio_gate_open: false,
    };
    node.send_cycle(CycleReason::Heartbeat, &sample).unwrap();
    let Some(Frame::Reading(r)) = master.poll_frame() else {
        panic!("expected a reading");
    };
    aggregator.ingest(r);

    let push = PingRecord {
        channel: Channel(81),
        target_id: RadioId(3),
        command: Command::ChangePower {
            power: PowerLevel::Min,
        },
        alarm_kind: AlarmKind::None,
        danger_level: DangerLevel::None,
    };
    master.send_ping(&push).unwrap();
    let Some(Frame::Ping(ping)) = node.poll_frame() else {
        panic!("node should hear the push");
    };
    node.handle_ping(&ping).unwrap();

    let Some(Frame::Ping(ack)) = master.poll_frame() else {
        panic!("master should hear the ack");
    };
    assert_eq!(ack.command, Command::Acknowledge);
    assert_eq!(ack.target_id, RadioId(3));
    aggregator.ingest_ack(&ack);
    assert_eq!(aggregator.status_of(RadioId(3)).unwrap().acks, 1);
}

#[test]
fn fire_reading_escalates() {
    let panel = RecordingPanel::default();
    let mut aggregator = Aggregator::new(panel.clone());

    let mut r = reading(5, 3200, 50.0, 105.0);
    r.motion_detected = true;
    let triage = aggregator.ingest(r).unwrap();
    assert_eq!(triage.alarm, AlarmKind::TempFire);
    assert_eq!(triage.danger, DangerLevel::Max);

    let log = panel.log.lock().unwrap();
    assert_eq!(log.notifications, vec!["fire-range temperature".to_owned()]);
}

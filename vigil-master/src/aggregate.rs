use std::collections::HashMap;

use vigil_core::{
    AlarmKind, ClassifierProfile, PingRecord, RadioId, ReadingRecord, Triage, classify,
};

use crate::display::{NodeView, Panel};

/// Latest known state of one TX node.
#[derive(Debug, Clone)]
pub struct NodeStatus {
    pub last_reading: ReadingRecord,
    pub triage: Triage,
    pub seen_at: jiff::Timestamp,
    pub readings: u64,
    pub acks: u64,
}

/// Per-source-node dispatch on the Master.
///
/// Every inbound reading is re-classified with the Master's own threshold
/// profile before display; the sender's embedded triage is advisory only,
/// since the two roles' thresholds have drifted apart.
pub struct Aggregator<P: Panel> {
    registry: HashMap<RadioId, NodeStatus>,
    panel: P,
}

impl<P: Panel> Aggregator<P> {
    pub fn new(panel: P) -> Self {
        Self {
            registry: HashMap::new(),
            panel,
        }
    }

    /// Thread one decoded reading through classification, the registry and
    /// the display. Returns the Master-side triage, or `None` when the
    /// source id is outside the node range.
    pub fn ingest(&mut self, reading: ReadingRecord) -> Option<Triage> {
        let source = reading.source_radio;
        if !source.is_node() {
            tracing::warn!(source = source.0, "reading from unknown source id, dropped");
            return None;
        }

        let triage = classify(&reading, ClassifierProfile::Master);

        self.registry
            .entry(source)
            .and_modify(|s| {
                s.last_reading = reading;
                s.triage = triage;
                s.seen_at = jiff::Timestamp::now();
                s.readings += 1;
            })
            .or_insert_with(|| NodeStatus {
                last_reading: reading,
                triage,
                seen_at: jiff::Timestamp::now(),
                readings: 1,
                acks: 0,
            });

        let view = NodeView {
            radio_id: source,
            channel: reading.source_channel,
            co2_ppm: reading.co2_ppm,
            humidity: reading.humidity,
            temp_c: reading.temp_c,
            temp_f: reading.temp_f,
            motion_detected: reading.motion_detected,
            audio_gate_open: reading.audio_gate_open,
            alarm: triage.alarm,
            danger: triage.danger,
        };
        self.panel.render(&view);

        // Motion/audio routines fire only off the triage result, never off
        // the raw pin fields.
        match triage.alarm {
            AlarmKind::Intruder => self.panel.notify(&view, "motion detected"),
            AlarmKind::LoudNoise => self.panel.notify(&view, "loud noise detected"),
            AlarmKind::TempFire => self.panel.notify(&view, "fire-range temperature"),
            AlarmKind::Co2Danger => self.panel.notify(&view, "dangerous CO2 level"),
            _ => {}
        }

        Some(triage)
    }

    /// Record an acknowledge ping coming back from a node. Acks carry the
    /// replying node's id in `target_id`.
    pub fn ingest_ack(&mut self, ping: &PingRecord) {
        tracing::info!(
            channel = ping.channel.0,
            node = ping.target_id.0,
            "acknowledge received"
        );
        if let Some(status) = self.registry.get_mut(&ping.target_id) {
            status.acks += 1;
        }
    }

    pub fn status_of(&self, id: RadioId) -> Option<&NodeStatus> {
        self.registry.get(&id)
    }

    /// Snapshot for the console status dump, ordered by node id.
    pub fn statuses(&self) -> Vec<(RadioId, &NodeStatus)> {
        let mut entries: Vec<_> = self.registry.iter().map(|(id, s)| (*id, s)).collect();
        entries.sort_by_key(|(id, _)| id.0);
        entries
    }
}

use vigil_core::{AlarmKind, Channel, DangerLevel, RadioId};

/// The fields of the latest decoded reading that the display consumes.
/// No feedback flows from the panel back into the core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeView {
    pub radio_id: RadioId,
    pub channel: Channel,
    pub co2_ppm: i16,
    pub humidity: f32,
    pub temp_c: f32,
    pub temp_f: f32,
    pub motion_detected: bool,
    pub audio_gate_open: bool,
    pub alarm: AlarmKind,
    pub danger: DangerLevel,
}

/// Render surface for the Master. The reference hardware drives a small
/// LCD; here the same contract is satisfied by the terminal.
pub trait Panel: Send {
    /// Show the latest state of one node.
    fn render(&mut self, view: &NodeView);

    /// Surface an alarm routine (intruder, loud noise) to the operator.
    fn notify(&mut self, view: &NodeView, message: &str);
}

/// Terminal-backed panel.
#[derive(Debug, Default)]
pub struct TermPanel;

impl Panel for TermPanel {
    fn render(&mut self, view: &NodeView) {
        tracing::info!(
            node = view.radio_id.0,
            channel = view.channel.0,
            co2_ppm = view.co2_ppm,
            humidity = format!("{:.1}", view.humidity),
            temp_c = format!("{:.1}", view.temp_c),
            alarm = ?view.alarm,
            danger = ?view.danger,
            "node update"
        );
    }

    fn notify(&mut self, view: &NodeView, message: &str) {
        tracing::warn!(node = view.radio_id.0, danger = ?view.danger, "{message}");
    }
}

use serde::{Deserialize, Serialize};

use crate::protocol::ReadingRecord;

/// Classification of an abnormal sensor condition. The numeric encoding is
/// ascending severity; triage keeps the highest value among all firing
/// predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlarmKind {
    None = 0,
    HumidityLow = 1,
    Co2Low = 2,
    Co2Good = 3,
    HumidityHigh = 4,
    TempLow = 5,
    LoudNoise = 6,
    Co2High = 7,
    TempHigh = 8,
    Intruder = 9,
    Co2Danger = 10,
    TempFire = 11,
}

impl AlarmKind {
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// Total decoding: unknown bytes fall back to `None`.
    pub fn from_byte(value: u8) -> Self {
        match value {
            1 => AlarmKind::HumidityLow,
            2 => AlarmKind::Co2Low,
            3 => AlarmKind::Co2Good,
            4 => AlarmKind::HumidityHigh,
            5 => AlarmKind::TempLow,
            6 => AlarmKind::LoudNoise,
            7 => AlarmKind::Co2High,
            8 => AlarmKind::TempHigh,
            9 => AlarmKind::Intruder,
            10 => AlarmKind::Co2Danger,
            11 => AlarmKind::TempFire,
            _ => AlarmKind::None,
        }
    }
}

/// Coarse severity band attached to an [`AlarmKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DangerLevel {
    None = 0,
    Low = 1,
    Med = 2,
    High = 3,
    Max = 4,
}

impl DangerLevel {
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    pub fn from_byte(value: u8) -> Self {
        match value {
            1 => DangerLevel::Low,
            2 => DangerLevel::Med,
            3 => DangerLevel::High,
            4 => DangerLevel::Max,
            _ => DangerLevel::None,
        }
    }
}

/// Threshold variant applied by a unit.
///
/// The two roles historically disagree on the CO2 good/high band boundaries
/// (1600/1800 on the nodes vs. 2000 on the Master) and on whether the high
/// temperature bound is inclusive. Both variants are kept as-is rather than
/// unified; intent could not be confirmed either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassifierProfile {
    Node,
    Master,
}

/// Result of classifying one reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triage {
    pub alarm: AlarmKind,
    pub danger: DangerLevel,
}

impl Triage {
    fn none() -> Self {
        Self {
            alarm: AlarmKind::None,
            danger: DangerLevel::None,
        }
    }

    /// Fold a firing predicate's candidate in. Alarm and danger are each
    /// maximised on their own; the `>=` keeps the later-evaluated candidate
    /// on ties.
    fn absorb(&mut self, alarm: AlarmKind, danger: DangerLevel) {
        if alarm >= self.alarm {
            self.alarm = alarm;
        }
        if danger >= self.danger {
            self.danger = danger;
        }
    }
}

/// Classify one reading against a fixed ordered list of independent
/// threshold predicates. Pure; the only side effect is advisory logging.
pub fn classify(reading: &ReadingRecord, profile: ClassifierProfile) -> Triage {
    let mut triage = Triage::none();

    let h = reading.humidity;
    if h < 10.0 {
        triage.absorb(AlarmKind::HumidityLow, DangerLevel::None);
    }
    if h >= 85.0 {
        triage.absorb(AlarmKind::HumidityHigh, DangerLevel::Low);
    }

    let t = reading.temp_c;
    if t < 20.0 {
        triage.absorb(AlarmKind::TempLow, DangerLevel::Low);
    }
    let temp_high = match profile {
        ClassifierProfile::Node => t >= 40.0 && t < 100.0,
        ClassifierProfile::Master => t > 40.0 && t < 100.0,
    };
    if temp_high {
        triage.absorb(AlarmKind::TempHigh, DangerLevel::High);
    }
    if t >= 100.0 {
        triage.absorb(AlarmKind::TempFire, DangerLevel::Max);
    }

    let co2 = reading.co2_ppm;
    if co2 <= 0 {
        triage.absorb(AlarmKind::Co2Low, DangerLevel::None);
    }
    let co2_good = match profile {
        ClassifierProfile::Node => (400..=1600).contains(&co2),
        ClassifierProfile::Master => (400..2000).contains(&co2),
    };
    if co2_good {
        triage.absorb(AlarmKind::Co2Good, DangerLevel::None);
    }
    let co2_high = match profile {
        ClassifierProfile::Node => (1800..3000).contains(&co2),
        ClassifierProfile::Master => (2000..3000).contains(&co2),
    };
    if co2_high {
        triage.absorb(AlarmKind::Co2High, DangerLevel::High);
    }
    if co2 >= 3000 {
        triage.absorb(AlarmKind::Co2Danger, DangerLevel::Max);
    }

    if reading.audio_gate_open {
        triage.absorb(AlarmKind::LoudNoise, DangerLevel::Med);
    }
    if reading.motion_detected {
        triage.absorb(AlarmKind::Intruder, DangerLevel::High);
    }

    if triage.alarm != AlarmKind::None {
        tracing::debug!(
            source = reading.source_radio.0,
            alarm = ?triage.alarm,
            danger = ?triage.danger,
            "reading triaged"
        );
    }

    triage
}

//! Engine configuration: tick granularity, reset behaviour and stopwatch
//! display format.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Time quantum added or removed per tick.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Granularity {
    /// 10 ms per tick, for displays with centiseconds.
    #[default]
    Centiseconds,
    /// 1000 ms per tick, for whole-second displays.
    Seconds,
}

impl Granularity {
    pub fn as_ms(self) -> u64 {
        match self {
            Granularity::Centiseconds => 10,
            Granularity::Seconds => 1000,
        }
    }
}

/// What `reset()` does with a configured countdown duration.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ResetPolicy {
    /// Keep the last configured duration; a countdown reset shows it again.
    #[default]
    RestoreConfigured,
    /// Forget the duration and return to the unconfigured state.
    Clear,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StopwatchFormat {
    /// `MM:SS`, minutes run past 59.
    #[default]
    MinutesSeconds,
    /// `HH:MM:SS` once an hour has elapsed.
    PromoteHours,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    pub granularity: Granularity,
    pub reset_policy: ResetPolicy,
    pub stopwatch_format: StopwatchFormat,
}

impl EngineConfig {
    pub fn interval_ms(&self) -> u64 {
        self.granularity.as_ms()
    }
}

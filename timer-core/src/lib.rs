//! Pure timing logic library with no platform dependencies.
//! Testable on host; the host application supplies the tick source through
//! the `Scheduler` trait.

pub mod config;
pub mod duration;
pub mod engine;
pub mod format;
pub mod laps;
pub mod scheduler;

pub use config::{EngineConfig, Granularity, ResetPolicy, StopwatchFormat};
pub use duration::{parse_field, preset_index, DurationField, PendingDuration, PRESET_MINUTES};
pub use engine::{Mode, RunState, SubscriptionId, TimerEngine, TimerState, MAX_DISPLAY_MS};
pub use format::{centis, format_countdown, format_hms, format_ms, format_stopwatch, FormattedTime};
pub use laps::{Lap, LapLabel, Laps};
pub use scheduler::Scheduler;

//! The stopwatch/countdown state machine.
//!
//! `TimerEngine` owns a single `TimerState` and is its only writer. Every
//! command is synchronous and invalid commands are silent no-ops. Derived
//! values (formatted time, progress, lap statistics) are computed on demand
//! from the state and never stored.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, ResetPolicy};
use crate::duration::{DurationField, PendingDuration};
use crate::format::{format_countdown, format_stopwatch, FormattedTime};
use crate::laps::Laps;
use crate::scheduler::Scheduler;

/// Upper bound for manual `add_minute()` increments (99:59:59).
pub const MAX_DISPLAY_MS: u64 = 359_999_000;

const MINUTE_MS: u64 = 60_000;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Mode {
    #[default]
    Stopwatch,
    Countdown,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Stopwatch => Mode::Countdown,
            Mode::Countdown => Mode::Stopwatch,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Stopwatch => "Stopwatch",
            Mode::Countdown => "Countdown",
        }
    }
}

/// Where the timer sits in its lifecycle. Derived, not stored.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RunState {
    Idle,
    Running,
    Paused,
    /// Countdown reached zero. Unlike a fresh reset the configured duration
    /// is still known, so the display can show "of HH:MM:SS" and 100%.
    Finished,
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct TimerState {
    pub mode: Mode,
    pub elapsed_ms: u64,
    /// Countdown length chosen before starting; 0 means unconfigured.
    pub initial_duration_ms: u64,
    pub running: bool,
    /// Only meaningful while `running`.
    pub paused: bool,
    pub laps: Laps,
    pub pending: PendingDuration,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&TimerState)>;

pub struct TimerEngine {
    state: TimerState,
    config: EngineConfig,
    scheduler: Option<Box<dyn Scheduler>>,
    armed: bool,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl TimerEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            state: TimerState::default(),
            config,
            scheduler: None,
            armed: false,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn with_mode(config: EngineConfig, mode: Mode) -> Self {
        let mut engine = Self::new(config);
        engine.state.mode = mode;
        engine
    }

    // ---- scheduling -------------------------------------------------------

    /// Hand the engine its tick source. Replaces (and cancels) any previous
    /// one; arms immediately if the timer is already ticking.
    pub fn attach_scheduler(&mut self, scheduler: Box<dyn Scheduler>) {
        self.detach_scheduler();
        self.scheduler = Some(scheduler);
        self.sync_scheduler();
    }

    pub fn detach_scheduler(&mut self) -> Option<Box<dyn Scheduler>> {
        self.disarm();
        self.scheduler.take()
    }

    fn sync_scheduler(&mut self) {
        let want = self.is_ticking();
        if want && !self.armed {
            if let Some(scheduler) = self.scheduler.as_mut() {
                scheduler.arm(self.config.interval_ms());
                self.armed = true;
            }
        } else if !want {
            self.disarm();
        }
    }

    fn disarm(&mut self) {
        if self.armed {
            if let Some(scheduler) = self.scheduler.as_mut() {
                scheduler.cancel();
            }
            self.armed = false;
        }
    }

    // ---- observers --------------------------------------------------------

    pub fn subscribe(&mut self, f: impl FnMut(&TimerState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(f)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    fn changed(&mut self) {
        self.sync_scheduler();
        for (_, f) in self.subscribers.iter_mut() {
            f(&self.state);
        }
    }

    // ---- commands ---------------------------------------------------------

    /// Begin or resume ticking. An empty countdown cannot be started.
    pub fn start(&mut self) {
        if self.state.mode == Mode::Countdown && self.state.elapsed_ms == 0 {
            log::debug!("start ignored: countdown has no time left");
            return;
        }
        if self.is_ticking() {
            return;
        }
        self.state.running = true;
        self.state.paused = false;
        log::debug!("{} started at {} ms", self.state.mode.label(), self.state.elapsed_ms);
        self.changed();
    }

    pub fn pause(&mut self) {
        if !self.state.running || self.state.paused {
            return;
        }
        self.state.paused = true;
        log::debug!("{} paused at {} ms", self.state.mode.label(), self.state.elapsed_ms);
        self.changed();
    }

    /// Pause while ticking, otherwise start (or resume from pause).
    pub fn toggle_run_pause(&mut self) {
        if self.is_ticking() {
            self.pause();
        } else {
            self.start();
        }
    }

    pub fn reset(&mut self) {
        let restore_ms = match self.config.reset_policy {
            ResetPolicy::RestoreConfigured if self.state.mode == Mode::Countdown => {
                self.state.initial_duration_ms
            }
            ResetPolicy::RestoreConfigured => 0,
            ResetPolicy::Clear => {
                self.state.initial_duration_ms = 0;
                0
            }
        };
        self.state.running = false;
        self.state.paused = false;
        self.state.elapsed_ms = restore_ms;
        self.state.laps.clear();
        log::debug!("{} reset to {} ms", self.state.mode.label(), restore_ms);
        self.changed();
    }

    /// Advance one granularity step. Ignored unless running and not paused,
    /// so a late callback from a cancelled scheduler is harmless.
    pub fn tick(&mut self) {
        if !self.is_ticking() {
            return;
        }
        let step = self.config.interval_ms();
        match self.state.mode {
            Mode::Stopwatch => {
                self.state.elapsed_ms = self.state.elapsed_ms.saturating_add(step);
            }
            Mode::Countdown => {
                if self.state.elapsed_ms <= step {
                    self.state.elapsed_ms = 0;
                    self.state.running = false;
                    self.state.paused = false;
                    log::info!(
                        "countdown of {} ms finished",
                        self.state.initial_duration_ms
                    );
                } else {
                    self.state.elapsed_ms -= step;
                }
            }
        }
        self.changed();
    }

    pub fn add_lap(&mut self) {
        if !self.state.running || self.state.elapsed_ms == 0 {
            return;
        }
        let lap = self.state.laps.push(self.state.elapsed_ms);
        log::debug!("lap {} at {} ms", lap.index, lap.time_ms);
        self.changed();
    }

    /// Switch direction. Elapsed time and laps carry over.
    pub fn set_mode(&mut self, mode: Mode) {
        if self.state.mode == mode {
            return;
        }
        self.state.mode = mode;
        if mode == Mode::Countdown {
            let s = &mut self.state;
            if s.elapsed_ms > s.initial_duration_ms {
                s.initial_duration_ms = s.elapsed_ms;
            } else if s.elapsed_ms == 0 && s.initial_duration_ms > 0 {
                // Zero carried over from the stopwatch is not a finished
                // countdown; show the configured duration again.
                s.elapsed_ms = s.initial_duration_ms;
            }
        }
        log::debug!("mode switched to {}", mode.label());
        // The pending callback belongs to the old mode; re-arm for the new one.
        self.disarm();
        self.changed();
    }

    /// Configure the countdown length. Fields are clamped; a zero total is
    /// ignored.
    pub fn configure_countdown(&mut self, hours: u32, minutes: u32, seconds: u32) {
        let pending = PendingDuration::new(hours, minutes, seconds);
        let total = pending.total_ms();
        if total == 0 {
            log::debug!("configure ignored: zero-length countdown");
            return;
        }
        self.state.pending = pending;
        self.state.initial_duration_ms = total;
        self.state.elapsed_ms = total;
        log::debug!("countdown configured for {} ms", total);
        self.changed();
    }

    pub fn configure_from_pending(&mut self) {
        let p = self.state.pending;
        self.configure_countdown(p.hours, p.minutes, p.seconds);
    }

    pub fn adjust_pending_field(&mut self, field: DurationField, delta: i32) {
        if self.is_configured() || delta == 0 {
            return;
        }
        self.state.pending.adjust(field, delta);
        self.changed();
    }

    pub fn set_pending(&mut self, pending: PendingDuration) {
        if self.is_configured() || self.state.pending == pending {
            return;
        }
        self.state.pending = pending;
        self.changed();
    }

    pub fn apply_preset(&mut self, minutes: u32) {
        self.set_pending(PendingDuration::from_minutes(minutes));
    }

    pub fn add_minute(&mut self) {
        if !self.state.running || self.state.elapsed_ms >= MAX_DISPLAY_MS {
            return;
        }
        let next = (self.state.elapsed_ms + MINUTE_MS).min(MAX_DISPLAY_MS);
        self.state.elapsed_ms = next;
        if self.state.mode == Mode::Countdown && next > self.state.initial_duration_ms {
            self.state.initial_duration_ms = next;
        }
        self.changed();
    }

    // ---- queries ----------------------------------------------------------

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.state.elapsed_ms
    }

    pub fn initial_duration_ms(&self) -> u64 {
        self.state.initial_duration_ms
    }

    pub fn pending(&self) -> &PendingDuration {
        &self.state.pending
    }

    pub fn laps(&self) -> &Laps {
        &self.state.laps
    }

    pub fn fastest_lap(&self) -> Option<u64> {
        self.state.laps.fastest()
    }

    pub fn slowest_lap(&self) -> Option<u64> {
        self.state.laps.slowest()
    }

    pub fn is_configured(&self) -> bool {
        self.state.initial_duration_ms > 0
    }

    pub fn is_ticking(&self) -> bool {
        self.state.running && !self.state.paused
    }

    pub fn is_scheduler_armed(&self) -> bool {
        self.armed
    }

    pub fn run_state(&self) -> RunState {
        let s = &self.state;
        if s.running {
            if s.paused {
                RunState::Paused
            } else {
                RunState::Running
            }
        } else if s.mode == Mode::Countdown && s.elapsed_ms == 0 && s.initial_duration_ms > 0 {
            RunState::Finished
        } else {
            RunState::Idle
        }
    }

    pub fn is_finished(&self) -> bool {
        self.run_state() == RunState::Finished
    }

    pub fn formatted_time(&self) -> FormattedTime {
        match self.state.mode {
            Mode::Stopwatch => format_stopwatch(self.state.elapsed_ms, self.config.stopwatch_format),
            Mode::Countdown => format_countdown(self.state.elapsed_ms),
        }
    }

    /// Share of the countdown already consumed, 0..=100.
    pub fn progress_percent(&self) -> f64 {
        let initial = self.state.initial_duration_ms;
        if self.state.mode != Mode::Countdown || initial == 0 {
            return 0.0;
        }
        let done = initial.saturating_sub(self.state.elapsed_ms);
        (done as f64 / initial as f64 * 100.0).clamp(0.0, 100.0)
    }

    /// Position of the stopwatch sweep within the current second.
    pub fn second_fraction(&self) -> f64 {
        if !self.state.running {
            return 0.0;
        }
        (self.state.elapsed_ms % 1000) as f64 / 1000.0
    }
}

impl Drop for TimerEngine {
    fn drop(&mut self) {
        self.disarm();
    }
}

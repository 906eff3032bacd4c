use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use timer_core::Scheduler;

use crate::AppOp;

/// Control messages understood by the pump thread.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PumpOp {
    Start(u64),
    Stop,
    Quit,
}

/// The engine's view of the pump. Tracks whether the pump is running so
/// redundant arm/cancel calls never reach the thread.
pub struct PumpScheduler {
    control: Sender<PumpOp>,
    pump_running: bool,
}

impl PumpScheduler {
    pub fn new(control: Sender<PumpOp>) -> Self {
        Self {
            control,
            pump_running: false,
        }
    }
}

impl Scheduler for PumpScheduler {
    fn arm(&mut self, interval_ms: u64) {
        if self.pump_running {
            return;
        }
        match self.control.send(PumpOp::Start(interval_ms)) {
            Ok(()) => self.pump_running = true,
            Err(_) => log::error!("pump thread is gone, cannot start ticking"),
        }
    }

    fn cancel(&mut self) {
        if self.pump_running {
            self.pump_running = false;
            self.control.send(PumpOp::Stop).ok();
        }
    }
}

pub struct PumpHandle {
    control: Sender<PumpOp>,
    thread: Option<JoinHandle<()>>,
}

impl PumpHandle {
    pub fn spawn(events: Sender<AppOp>) -> Self {
        let (control, rx) = mpsc::channel();
        let thread = thread::spawn(move || pump_thread(rx, events));
        Self {
            control,
            thread: Some(thread),
        }
    }

    pub fn scheduler(&self) -> PumpScheduler {
        PumpScheduler::new(self.control.clone())
    }

    pub fn shutdown(mut self) {
        self.control.send(PumpOp::Quit).ok();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("pump thread panicked");
            }
        }
    }
}

fn pump_thread(control: Receiver<PumpOp>, events: Sender<AppOp>) {
    let mut interval = Duration::from_millis(1000);
    let mut next_tick: Option<Instant> = None;

    loop {
        let op = match next_tick {
            Some(deadline) => {
                let wait = deadline.saturating_duration_since(Instant::now());
                match control.recv_timeout(wait) {
                    Ok(op) => op,
                    Err(RecvTimeoutError::Timeout) => {
                        if events.send(AppOp::Pump).is_err() {
                            break;
                        }
                        // Schedule from the previous deadline, not from now.
                        let mut next = deadline + interval;
                        let now = Instant::now();
                        if next < now {
                            next = now + interval;
                        }
                        next_tick = Some(next);
                        continue;
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            // Block-wait when stopped
            None => match control.recv() {
                Ok(op) => op,
                Err(_) => break,
            },
        };

        match op {
            PumpOp::Start(ms) => {
                let ms = if ms == 0 { 100 } else { ms };
                interval = Duration::from_millis(ms);
                next_tick = Some(Instant::now() + interval);
                log::debug!("pump started, interval {} ms", ms);
            }
            PumpOp::Stop => {
                next_tick = None;
                log::debug!("pump stopped");
            }
            PumpOp::Quit => break,
        }
    }
}

/// The platform side of the tick loop.
///
/// The host owns the real timer primitive. Once armed it is expected to call
/// `TimerEngine::tick` every `interval_ms` until cancelled. The engine arms
/// and cancels at most once per transition, but implementations should still
/// tolerate a redundant call.
pub trait Scheduler {
    fn arm(&mut self, interval_ms: u64);
    fn cancel(&mut self);
}

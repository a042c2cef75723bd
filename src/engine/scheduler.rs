use crate::engine::clock::FrameClock;
use crate::engine::opts::LoopProgress;
use crate::foundation::core::{InstanceId, TickHandle, Timestamp};
use crate::foundation::error::{DisruptError, DisruptResult};

/// Lifecycle of one instance's animation loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Phase {
    /// Set up but not started.
    Idle,
    /// First tick requested, no frame seen yet.
    Pending,
    /// Ticking; `start` is the timestamp of the first tick.
    Running { start: Timestamp },
    /// Finished or stopped. Further ticks are ignored.
    Terminated,
}

/// What a tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TickOutcome {
    /// Animated and requested another tick.
    Continue,
    /// Performed the final animate; the instance should be removed.
    Finished,
    /// Nothing happened (not started, stopped, or no tick was requested).
    Ignored,
}

/// Per-instance tick loop: one `animate` call per frame until progress reaches 1.
#[derive(Clone, Debug)]
pub(crate) struct Scheduler {
    phase: Phase,
    runtime_ms: f64,
    looping: bool,
    loop_progress: LoopProgress,
    pending: Option<TickHandle>,
}

impl Scheduler {
    /// Fails for runtimes that are not finite and positive.
    pub(crate) fn new(
        runtime_ms: f64,
        looping: bool,
        loop_progress: LoopProgress,
    ) -> DisruptResult<Self> {
        if !runtime_ms.is_finite() || runtime_ms <= 0.0 {
            return Err(DisruptError::validation(format!(
                "effect runtime must be finite and > 0 ms, got {runtime_ms}"
            )));
        }
        Ok(Self {
            phase: Phase::Idle,
            runtime_ms,
            looping,
            loop_progress,
            pending: None,
        })
    }

    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn runtime_ms(&self) -> f64 {
        self.runtime_ms
    }

    /// Request the first tick. Only valid from `Idle`.
    pub(crate) fn start<C: FrameClock + ?Sized>(&mut self, clock: &mut C, id: InstanceId) {
        if self.phase != Phase::Idle {
            return;
        }
        self.pending = Some(clock.request_tick(id));
        self.phase = Phase::Pending;
    }

    /// Raw `elapsed / runtime` at `ts`, before the loop policy is applied.
    fn raw_progress(&self, start: Timestamp, ts: Timestamp) -> f64 {
        ts.millis_since(start).max(0.0) / self.runtime_ms
    }

    /// Handle one delivered tick, calling `animate` with the progress for this frame.
    pub(crate) fn tick<C, F>(
        &mut self,
        clock: &mut C,
        id: InstanceId,
        ts: Timestamp,
        animate: F,
    ) -> DisruptResult<TickOutcome>
    where
        C: FrameClock + ?Sized,
        F: FnOnce(f64) -> DisruptResult<()>,
    {
        if self.pending.take().is_none() {
            return Ok(TickOutcome::Ignored);
        }
        let raw = match self.phase {
            Phase::Idle | Phase::Terminated => return Ok(TickOutcome::Ignored),
            Phase::Pending => {
                self.phase = Phase::Running { start: ts };
                0.0
            }
            Phase::Running { start } => self.raw_progress(start, ts),
        };

        if let Err(err) = animate(self.loop_progress.apply(raw, self.looping)) {
            self.phase = Phase::Terminated;
            return Err(err);
        }

        if raw < 1.0 || self.looping {
            self.pending = Some(clock.request_tick(id));
            Ok(TickOutcome::Continue)
        } else {
            self.phase = Phase::Terminated;
            Ok(TickOutcome::Finished)
        }
    }

    /// Cancel the pending tick and terminate.
    pub(crate) fn stop<C: FrameClock + ?Sized>(&mut self, clock: &mut C) {
        if let Some(handle) = self.pending.take() {
            clock.cancel_tick(handle);
        }
        self.phase = Phase::Terminated;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/scheduler.rs"]
mod tests;

use std::collections::BTreeMap;

use crate::foundation::core::{InstanceId, TickHandle};

/// Display-refresh style tick source.
///
/// Instances request at most one tick at a time. The host drains the requested ticks once per
/// refresh and hands them to [`crate::Engine::frame`]; ticks requested while a frame is being
/// processed belong to the next drain.
pub trait FrameClock {
    /// Ask for `instance` to be ticked on the next frame.
    fn request_tick(&mut self, instance: InstanceId) -> TickHandle;

    /// Withdraw a pending request. Unknown or already drained handles are ignored.
    fn cancel_tick(&mut self, handle: TickHandle);

    /// Take every pending request, in request order.
    fn drain_requested(&mut self) -> Vec<InstanceId>;
}

/// In-process [`FrameClock`]: an ordered queue of pending tick requests.
#[derive(Clone, Debug, Default)]
pub struct TickQueue {
    next_handle: u64,
    pending: BTreeMap<TickHandle, InstanceId>,
}

impl TickQueue {
    /// Empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pending requests.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Return `true` when nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Return `true` when `instance` has a pending request.
    pub fn is_requested(&self, instance: InstanceId) -> bool {
        self.pending.values().any(|&id| id == instance)
    }
}

impl FrameClock for TickQueue {
    fn request_tick(&mut self, instance: InstanceId) -> TickHandle {
        let handle = TickHandle(self.next_handle);
        self.next_handle += 1;
        self.pending.insert(handle, instance);
        handle
    }

    fn cancel_tick(&mut self, handle: TickHandle) {
        self.pending.remove(&handle);
    }

    fn drain_requested(&mut self) -> Vec<InstanceId> {
        std::mem::take(&mut self.pending).into_values().collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/clock.rs"]
mod tests;

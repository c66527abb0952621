//! Inter-task messages and the bounded queues that carry them.
//!
//! Queue entries are bare discriminants. A receiver that needs data queries
//! the owning controller after waking, so producers in interrupt-like
//! contexts never serialise payloads and never block.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TrySendError};
use log::warn;

use crate::hw::SystemSink;

/// Inbound message kinds understood by the display task.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DisplayMessage {
    GoToRunning,
    GoToSleep,
    DimScreen,
    RestoreBrightness,
    NewNotification,
    TimerDone,
    AlarmTriggered,
    ButtonPushed,
    BleConnectionUpdated,
    ChargingEvent,
}

/// Requests to the host system task. No response channel.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SystemRequest {
    GoToSleep,
    ToggleBleRadio,
}

pub const DISPLAY_QUEUE_CAPACITY: usize = 10;
pub const SYSTEM_QUEUE_CAPACITY: usize = 8;

pub type DisplayQueue =
    Channel<CriticalSectionRawMutex, DisplayMessage, DISPLAY_QUEUE_CAPACITY>;
pub type SystemQueue = Channel<CriticalSectionRawMutex, SystemRequest, SYSTEM_QUEUE_CAPACITY>;

/// Producer-side handle to the display task's inbound queue. Cheap to copy
/// and safe to use from any execution context.
#[derive(Clone, Copy)]
pub struct DisplayHandle {
    queue: &'static DisplayQueue,
}

impl DisplayHandle {
    pub const fn new(queue: &'static DisplayQueue) -> Self {
        Self { queue }
    }

    /// Enqueues without blocking. On a full queue the message is handed
    /// back to the caller; delivery is best-effort, not guaranteed-once.
    pub fn push(&self, message: DisplayMessage) -> Result<(), DisplayMessage> {
        self.queue
            .try_send(message)
            .map_err(|TrySendError::Full(rejected)| rejected)
    }
}

/// Fire-and-forget sender bound to the system task's queue.
#[derive(Clone, Copy)]
pub struct SystemHandle {
    queue: &'static SystemQueue,
}

impl SystemHandle {
    pub const fn new(queue: &'static SystemQueue) -> Self {
        Self { queue }
    }
}

impl SystemSink for SystemHandle {
    fn notify(&mut self, request: SystemRequest) {
        if self.queue.try_send(request).is_err() {
            warn!("system queue full, {:?} dropped", request);
        }
    }
}

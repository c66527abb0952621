//! Hardware capability seams consumed by the display core.
//!
//! All calls are synchronous and non-blocking; the hardware behind them is
//! exclusively owned by the display task while it runs.

use crate::messages::SystemRequest;
use crate::screen::{RefreshDirection, TouchEvent};

/// Backlight steps the board can realise.
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub enum BrightnessLevel {
    Off,
    Low,
    Medium,
    High,
}

/// Display panel control.
pub trait DisplayDriver {
    fn init(&mut self);

    /// Arms a full redraw of the panel along the given animation vector.
    fn full_refresh(&mut self, direction: RefreshDirection);
}

pub trait Backlight {
    fn set_level(&mut self, level: BrightnessLevel);
}

/// Touch controller sample source. Each call drains at most one
/// already-classified sample; `None` when the controller is quiescent.
pub trait TouchPanel {
    fn next_sample(&mut self) -> Option<TouchEvent>;
}

/// Marks the running firmware image as good once it has survived the
/// post-boot window. The validation algorithm itself lives elsewhere.
pub trait FirmwareValidator {
    fn mark_valid(&mut self);
}

/// Outbound channel to the host system task. Fire-and-forget: the host
/// task outlives this component and there is no response path.
pub trait SystemSink {
    fn notify(&mut self, request: SystemRequest);
}

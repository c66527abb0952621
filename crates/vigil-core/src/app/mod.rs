//! Display-control state machine: navigation, touch routing, dimming and
//! lifecycle sequencing.
//!
//! All mutation happens inside the one task that owns the [`WatchApp`];
//! other tasks reach it only through the bounded inbound queue. No locks
//! are held across any of this state.

use heapless::Vec;
use log::{debug, info};

use crate::hw::{
    Backlight, BrightnessLevel, DisplayDriver, FirmwareValidator, SystemSink, TouchPanel,
};
use crate::messages::{DisplayMessage, SystemRequest};
use crate::screen::{RefreshDirection, Screen, ScreenFactory, ScreenId, TouchEvent};

/// Maximum depth of back-navigation history. A hard resource bound on this
/// device class; pushes beyond it are rejected, not evicted.
pub const RETURN_STACK_DEPTH: usize = 10;

/// Power-state pair governing display dimming.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LifecycleState {
    Idle,
    Running,
}

/// Startup classification supplied once at [`WatchApp::start`]. Hardware
/// trouble is routed to the recovery screen instead of being propagated.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum BootError {
    #[default]
    None,
    TouchControllerUnresponsive,
    FirmwareValidationFailed,
}

/// One saved (screen, direction) pair enabling back-navigation. Keeping the
/// pair in a single stack keeps the id and direction histories in lockstep
/// by construction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct NavigationEntry {
    screen_id: ScreenId,
    direction: RefreshDirection,
}

/// The single in-flight navigation request awaiting commit.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct PendingNavigation {
    screen_id: ScreenId,
    direction: RefreshDirection,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WatchConfig {
    /// Inactivity window after which the display dims.
    pub idle_timeout_ms: u64,
    pub active_brightness: BrightnessLevel,
    pub dimmed_brightness: BrightnessLevel,
    /// Uptime a freshly flashed image must survive before it is marked good.
    pub validation_window_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            idle_timeout_ms: 15_000,
            active_brightness: BrightnessLevel::Medium,
            dimmed_brightness: BrightnessLevel::Low,
            validation_window_ms: 5_000,
        }
    }
}

pub struct WatchApp<P, SF, SYS>
where
    P: DisplayDriver + Backlight + TouchPanel + FirmwareValidator,
    SF: ScreenFactory,
    SYS: SystemSink,
{
    platform: P,
    screens: SF,
    system: Option<SYS>,
    config: WatchConfig,
    state: LifecycleState,
    is_dimmed: bool,
    last_activity_ms: u64,
    current: Option<SF::Screen>,
    current_id: ScreenId,
    pending: Option<PendingNavigation>,
    forced_refresh: Option<RefreshDirection>,
    return_stack: Vec<NavigationEntry, RETURN_STACK_DEPTH>,
    validation_due_ms: Option<u64>,
}

include!("runtime.rs");
include!("navigation.rs");
include!("touch.rs");
include!("brightness.rs");

#[cfg(test)]
mod tests;

//! Three-rail LED backlight.
//!
//! The panel stacks low/mid/high LED rails behind separate GPIOs; the
//! effective brightness is the set of rails currently driven.

use esp_hal::gpio::Output;
use log::debug;
use vigil_core::hw::{Backlight, BrightnessLevel};

pub struct RailBacklight {
    low: Output<'static>,
    mid: Output<'static>,
    high: Output<'static>,
}

impl RailBacklight {
    pub fn new(low: Output<'static>, mid: Output<'static>, high: Output<'static>) -> Self {
        Self { low, mid, high }
    }

    fn drive(&mut self, low: bool, mid: bool, high: bool) {
        self.low.set_level(low.into());
        self.mid.set_level(mid.into());
        self.high.set_level(high.into());
    }
}

impl Backlight for RailBacklight {
    fn set_level(&mut self, level: BrightnessLevel) {
        debug!("backlight {:?}", level);
        match level {
            BrightnessLevel::Off => self.drive(false, false, false),
            BrightnessLevel::Low => self.drive(true, false, false),
            BrightnessLevel::Medium => self.drive(true, true, false),
            BrightnessLevel::High => self.drive(true, true, true),
        }
    }
}

//! ESP32-S3 board adapters for the Vigil display core.
//!
//! Everything here implements the capability traits from `vigil_core::hw`
//! against the watch board: ST7789 panel over SPI, CST816S touch controller
//! over I2C, a three-rail LED backlight and the OTA slot bookkeeping used
//! for firmware validation.
#![no_std]

pub mod backlight;
pub mod display;
pub mod flash;
pub mod touch;
pub mod validator;

use vigil_core::hw::{
    Backlight, BrightnessLevel, DisplayDriver, FirmwareValidator, TouchPanel,
};
use vigil_core::screen::{RefreshDirection, TouchEvent};

/// Bundles the four hardware capabilities into the single platform value
/// the display core owns.
pub struct Board<D, B, T, V> {
    pub display: D,
    pub backlight: B,
    pub touch: T,
    pub validator: V,
}

impl<D, B, T, V> DisplayDriver for Board<D, B, T, V>
where
    D: DisplayDriver,
{
    fn init(&mut self) {
        self.display.init();
    }

    fn full_refresh(&mut self, direction: RefreshDirection) {
        self.display.full_refresh(direction);
    }
}

impl<D, B, T, V> Backlight for Board<D, B, T, V>
where
    B: Backlight,
{
    fn set_level(&mut self, level: BrightnessLevel) {
        self.backlight.set_level(level);
    }
}

impl<D, B, T, V> TouchPanel for Board<D, B, T, V>
where
    T: TouchPanel,
{
    fn next_sample(&mut self) -> Option<TouchEvent> {
        self.touch.next_sample()
    }
}

impl<D, B, T, V> FirmwareValidator for Board<D, B, T, V>
where
    V: FirmwareValidator,
{
    fn mark_valid(&mut self) {
        self.validator.mark_valid();
    }
}

//! ST7789 panel bring-up and the display-control capability over it.
//!
//! The panel is shared between this driver (init, full-refresh clears) and
//! the screens that draw on it, all on the display task; the blocking mutex
//! plus `RefCell` makes that sharing explicit without cross-task locking.

use core::cell::RefCell;

use display_interface_spi::SPIInterface;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::RgbColor;
use embedded_hal_bus::spi::ExclusiveDevice;
use esp_hal::Blocking;
use esp_hal::delay::Delay;
use esp_hal::gpio::Output;
use esp_hal::spi::master::Spi;
use log::{debug, warn};
use mipidsi::models::ST7789;
use mipidsi::options::ColorInversion;
use mipidsi::{Builder, Display};

use vigil_core::hw::DisplayDriver;
use vigil_core::screen::RefreshDirection;

pub const LCD_WIDTH: u16 = 240;
pub const LCD_HEIGHT: u16 = 240;

pub type LcdSpi = ExclusiveDevice<Spi<'static, Blocking>, Output<'static>, Delay>;
pub type Lcd = Display<SPIInterface<LcdSpi, Output<'static>>, ST7789, Output<'static>>;
pub type SharedLcd = Mutex<CriticalSectionRawMutex, RefCell<Lcd>>;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum LcdInitError {
    Bus,
    Panel,
}

/// Brings the ST7789 out of reset and hands back the initialised panel.
pub fn init_lcd(
    spi: Spi<'static, Blocking>,
    cs: Output<'static>,
    dc: Output<'static>,
    rst: Output<'static>,
    delay: &mut Delay,
) -> Result<Lcd, LcdInitError> {
    let device = ExclusiveDevice::new(spi, cs, Delay::new()).map_err(|_| LcdInitError::Bus)?;
    let di = SPIInterface::new(device, dc);

    Builder::new(ST7789, di)
        .reset_pin(rst)
        .display_size(LCD_WIDTH, LCD_HEIGHT)
        .invert_colors(ColorInversion::Inverted)
        .init(delay)
        .map_err(|_| LcdInitError::Panel)
}

/// Display-control capability over the shared panel.
pub struct WatchDisplay {
    lcd: &'static SharedLcd,
    fault_logged: bool,
}

impl WatchDisplay {
    pub fn new(lcd: &'static SharedLcd) -> Self {
        Self {
            lcd,
            fault_logged: false,
        }
    }

    fn clear(&mut self) {
        let result = self.lcd.lock(|lcd| lcd.borrow_mut().clear(Rgb565::BLACK));
        if result.is_err() && !self.fault_logged {
            warn!("lcd clear failed, panel unresponsive");
            self.fault_logged = true;
        }
    }
}

impl DisplayDriver for WatchDisplay {
    fn init(&mut self) {
        self.clear();
    }

    // Transition compositing is the renderer's job; at this level a full
    // refresh means the incoming screen starts from a blank panel.
    fn full_refresh(&mut self, direction: RefreshDirection) {
        debug!("full refresh ({:?})", direction);
        self.clear();
    }
}

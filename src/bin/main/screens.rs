//! Concrete watch faces drawn on the shared panel.
//!
//! Each face is a static layout drawn once per instantiation; the display
//! core recreates the face on every committed navigation, which is what
//! triggers the redraw.

use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::{FONT_6X10, FONT_10X20};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::text::Text;
use log::warn;

use vigil_core::app::BootError;
use vigil_core::screen::{Screen, ScreenFactory, ScreenId, TouchEvent};
use vigil_hal_esp32s3::display::SharedLcd;

fn face_title(id: ScreenId) -> &'static str {
    match id {
        ScreenId::None => "",
        ScreenId::Clock => "Vigil",
        ScreenId::Notifications => "Notifications",
        ScreenId::Timer => "Timer",
        ScreenId::Alarm => "Alarm",
        ScreenId::QuickSettings => "Quick settings",
        ScreenId::Settings => "Settings",
        ScreenId::Error => "Recovery",
    }
}

fn boot_error_detail(boot_error: BootError) -> &'static str {
    match boot_error {
        BootError::None => "no fault recorded",
        BootError::TouchControllerUnresponsive => "touch controller unresponsive",
        BootError::FirmwareValidationFailed => "firmware image rolled back",
    }
}

pub struct WatchScreens {
    lcd: &'static SharedLcd,
    boot_error: BootError,
}

impl WatchScreens {
    pub fn new(lcd: &'static SharedLcd, boot_error: BootError) -> Self {
        Self { lcd, boot_error }
    }
}

impl ScreenFactory for WatchScreens {
    type Screen = FaceScreen;

    fn create(&mut self, id: ScreenId) -> FaceScreen {
        FaceScreen {
            id,
            lcd: self.lcd,
            boot_error: self.boot_error,
            drawn: false,
            fault_logged: false,
        }
    }
}

pub struct FaceScreen {
    id: ScreenId,
    lcd: &'static SharedLcd,
    boot_error: BootError,
    drawn: bool,
    fault_logged: bool,
}

impl FaceScreen {
    fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let title_style = MonoTextStyle::new(&FONT_10X20, Rgb565::WHITE);
        Text::new(face_title(self.id), Point::new(24, 60), title_style).draw(target)?;

        if self.id == ScreenId::Error {
            let detail_style = MonoTextStyle::new(&FONT_6X10, Rgb565::RED);
            Text::new(
                boot_error_detail(self.boot_error),
                Point::new(24, 90),
                detail_style,
            )
            .draw(target)?;
        }
        Ok(())
    }
}

impl Screen for FaceScreen {
    fn refresh(&mut self) {
        if self.drawn {
            return;
        }
        let result = self.lcd.lock(|lcd| self.draw(&mut *lcd.borrow_mut()));
        match result {
            Ok(()) => self.drawn = true,
            Err(_) => {
                if !self.fault_logged {
                    warn!("draw failed on {:?}, panel unresponsive", self.id);
                    self.fault_logged = true;
                }
            }
        }
    }

    fn handle_touch(&mut self, event: TouchEvent) -> bool {
        // Static faces consume plain taps; long presses and swipes are
        // left to the router.
        matches!(event, TouchEvent::Tap | TouchEvent::DoubleTap)
    }
}

//! CST816S touch controller, polled over I2C.
//!
//! The controller classifies gestures in hardware and keeps reporting the
//! same classification for as long as the finger stays down; this driver
//! latches it so one physical gesture surfaces as one sample.

use embedded_hal::i2c::I2c;
use vigil_core::hw::TouchPanel;
use vigil_core::screen::TouchEvent;

const ADDRESS: u8 = 0x15;
const FRAME_LEN: usize = 8;

const GESTURE_SLIDE_DOWN: u8 = 0x01;
const GESTURE_SLIDE_UP: u8 = 0x02;
const GESTURE_SLIDE_LEFT: u8 = 0x03;
const GESTURE_SLIDE_RIGHT: u8 = 0x04;
const GESTURE_CLICK_SINGLE: u8 = 0x05;
const GESTURE_CLICK_DOUBLE: u8 = 0x0b;
const GESTURE_CLICK_LONG: u8 = 0x0c;

fn decode_gesture(code: u8) -> TouchEvent {
    match code {
        GESTURE_SLIDE_DOWN => TouchEvent::SwipeDown,
        GESTURE_SLIDE_UP => TouchEvent::SwipeUp,
        GESTURE_SLIDE_LEFT => TouchEvent::SwipeLeft,
        GESTURE_SLIDE_RIGHT => TouchEvent::SwipeRight,
        GESTURE_CLICK_SINGLE => TouchEvent::Tap,
        GESTURE_CLICK_DOUBLE => TouchEvent::DoubleTap,
        GESTURE_CLICK_LONG => TouchEvent::LongTap,
        _ => TouchEvent::None,
    }
}

pub struct Cst816s<I2C> {
    i2c: I2C,
    latched: TouchEvent,
}

impl<I2C> Cst816s<I2C>
where
    I2C: I2c,
{
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            latched: TouchEvent::None,
        }
    }

    /// Used at startup to classify an unresponsive controller.
    pub fn probe(&mut self) -> bool {
        let mut frame = [0u8; 1];
        self.i2c.write_read(ADDRESS, &[0x00], &mut frame).is_ok()
    }

    fn read_frame(&mut self) -> Option<[u8; FRAME_LEN]> {
        let mut frame = [0u8; FRAME_LEN];
        self.i2c
            .write_read(ADDRESS, &[0x00], &mut frame)
            .ok()
            .map(|_| frame)
    }
}

impl<I2C> TouchPanel for Cst816s<I2C>
where
    I2C: I2c,
{
    fn next_sample(&mut self) -> Option<TouchEvent> {
        let frame = self.read_frame()?;

        // frame[2] carries the contact count, frame[1] the gesture code.
        let contact = frame[2] & 0x0f != 0;
        if !contact {
            self.latched = TouchEvent::None;
            return None;
        }

        let event = decode_gesture(frame[1]);
        if event == self.latched {
            // Same contact still reporting; already surfaced.
            return None;
        }
        self.latched = event;
        (event != TouchEvent::None).then_some(event)
    }
}

//! Host-side companion tasks: the system request consumer and the side
//! button producer.

use embassy_time::Timer;
use esp_hal::gpio::Input;
use log::{info, warn};

use vigil_core::messages::{DisplayHandle, DisplayMessage, SystemRequest};

use crate::{BUTTON_DEBOUNCE_MS, SYSTEM_QUEUE};

/// Drains the system queue. On this board there is no separate power
/// controller, so a sleep request is acknowledged by echoing a dim back to
/// the display task.
#[embassy_executor::task]
pub async fn system_task(display: DisplayHandle) -> ! {
    loop {
        match SYSTEM_QUEUE.receive().await {
            SystemRequest::GoToSleep => {
                info!("system: sleep requested");
                if display.push(DisplayMessage::GoToSleep).is_err() {
                    warn!("display queue full, sleep acknowledgement dropped");
                }
            }
            SystemRequest::ToggleBleRadio => {
                info!("system: ble radio toggle requested");
            }
        }
    }
}

#[embassy_executor::task]
pub async fn button_task(mut button: Input<'static>, display: DisplayHandle) -> ! {
    loop {
        button.wait_for_falling_edge().await;
        if display.push(DisplayMessage::ButtonPushed).is_err() {
            warn!("display queue full, button press dropped");
        }
        Timer::after_millis(BUTTON_DEBOUNCE_MS).await;
    }
}

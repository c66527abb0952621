#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
#![deny(clippy::large_stack_frames)]

use core::cell::RefCell;

use embassy_executor::Spawner;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Instant, Timer, WithTimeout};
use esp_hal::{
    clock::CpuClock,
    delay::Delay,
    gpio::{Input, InputConfig, Level, Output, OutputConfig, Pull},
    i2c::master::{Config as I2cConfig, I2c},
    spi::master::{Config as SpiConfig, Spi},
    time::Rate,
    timer::timg::TimerGroup,
};
use log::{LevelFilter, info};
use static_cell::StaticCell;
use vigil_core::{
    app::{BootError, WatchApp, WatchConfig},
    messages::{DisplayHandle, DisplayQueue, SystemHandle, SystemQueue},
};
use vigil_hal_esp32s3::{
    Board,
    backlight::RailBacklight,
    display::{SharedLcd, WatchDisplay, init_lcd},
    flash::RawFlash,
    touch::Cst816s,
    validator::OtaValidator,
};

use screens::WatchScreens;

#[path = "main/screens.rs"]
mod screens;
#[path = "main/system.rs"]
mod system;

const DISPLAY_SPI_HZ: u32 = 40_000_000;
const TOUCH_I2C_HZ: u32 = 400_000;
/// Receive window of the message loop; housekeeping runs on expiry.
const CYCLE_PERIOD_MS: u64 = 100;
const BUTTON_DEBOUNCE_MS: u64 = 200;

static DISPLAY_QUEUE: DisplayQueue = Channel::new();
static SYSTEM_QUEUE: SystemQueue = Channel::new();
static LCD: StaticCell<SharedLcd> = StaticCell::new();

#[panic_handler]
fn panic(_: &core::panic::PanicInfo) -> ! {
    loop {}
}

// This creates a default app-descriptor required by the esp-idf bootloader.
// For more information see: <https://docs.espressif.com/projects/esp-idf/en/stable/esp32/api-reference/system/app_image_format.html#application-description>
esp_bootloader_esp_idf::esp_app_desc!();

fn uptime_ms() -> u64 {
    Instant::now().as_millis()
}

#[allow(
    clippy::large_stack_frames,
    reason = "it's not unusual to allocate larger buffers etc. in main"
)]
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    esp_println::logger::init_logger(LevelFilter::Info);
    esp_println::println!("boot: vigil starting");

    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    // Display wiring used by this board:
    // SCK=GPIO12, MOSI=GPIO11, CS=GPIO10, DC=GPIO9, RST=GPIO14
    let cs = Output::new(peripherals.GPIO10, Level::High, OutputConfig::default());
    let dc = Output::new(peripherals.GPIO9, Level::Low, OutputConfig::default());
    let rst = Output::new(peripherals.GPIO14, Level::High, OutputConfig::default());

    let spi_config = SpiConfig::default()
        .with_frequency(Rate::from_hz(DISPLAY_SPI_HZ))
        // ST7789 uses CPOL=0, CPHA=0.
        .with_mode(esp_hal::spi::Mode::_0);

    let spi = Spi::new(peripherals.SPI2, spi_config)
        .unwrap()
        .with_sck(peripherals.GPIO12)
        .with_mosi(peripherals.GPIO11);

    let mut delay = Delay::new();

    let panel = match init_lcd(spi, cs, dc, rst, &mut delay) {
        Ok(panel) => panel,
        Err(err) => {
            info!("lcd init failed: {:?}", err);
            loop {
                Timer::after_secs(1).await;
            }
        }
    };
    let lcd: &'static SharedLcd = LCD.init(Mutex::new(RefCell::new(panel)));
    esp_println::println!("display: init ok (SCK=12 MOSI=11 CS=10 DC=9 RST=14)");

    // Touch wiring: SDA=GPIO1, SCL=GPIO2.
    let i2c_config = I2cConfig::default().with_frequency(Rate::from_hz(TOUCH_I2C_HZ));
    let i2c = I2c::new(peripherals.I2C0, i2c_config)
        .unwrap()
        .with_sda(peripherals.GPIO1)
        .with_scl(peripherals.GPIO2);
    let mut touch = Cst816s::new(i2c);

    let mut validator = match RawFlash::new() {
        Ok(flash) => OtaValidator::new(flash),
        Err(err) => {
            info!("flash unlock failed: {:?}", err);
            loop {
                Timer::after_secs(1).await;
            }
        }
    };

    let boot_error = if touch.probe() {
        validator.classify_boot()
    } else {
        info!("touch controller not responding on probe");
        BootError::TouchControllerUnresponsive
    };

    // Backlight rails: LOW=GPIO4, MID=GPIO5, HIGH=GPIO6.
    let backlight = RailBacklight::new(
        Output::new(peripherals.GPIO4, Level::Low, OutputConfig::default()),
        Output::new(peripherals.GPIO5, Level::Low, OutputConfig::default()),
        Output::new(peripherals.GPIO6, Level::Low, OutputConfig::default()),
    );

    let board = Board {
        display: WatchDisplay::new(lcd),
        backlight,
        touch,
        validator,
    };

    let watch_config = WatchConfig::default();
    let mut app = WatchApp::new(board, WatchScreens::new(lcd, boot_error), watch_config);
    app.register(SystemHandle::new(&SYSTEM_QUEUE));

    // Side button on GPIO3, active low.
    let button = Input::new(peripherals.GPIO3, InputConfig::default().with_pull(Pull::Up));
    let display_handle = DisplayHandle::new(&DISPLAY_QUEUE);
    spawner
        .spawn(system::button_task(button, display_handle))
        .unwrap();
    spawner.spawn(system::system_task(display_handle)).unwrap();

    info!(
        "watch started: idle_timeout_ms={} validation_window_ms={} spi_hz={}",
        watch_config.idle_timeout_ms, watch_config.validation_window_ms, DISPLAY_SPI_HZ
    );

    app.start(boot_error, uptime_ms());

    loop {
        match DISPLAY_QUEUE
            .receive()
            .with_timeout(Duration::from_millis(CYCLE_PERIOD_MS))
            .await
        {
            Ok(message) => app.dispatch_message(message, uptime_ms()),
            Err(_) => app.process_cycle(uptime_ms()),
        }
    }
}

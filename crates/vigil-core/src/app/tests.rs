use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec as StdVec;

use super::*;

#[derive(Default)]
struct PlatformState {
    samples: VecDeque<TouchEvent>,
    backlight: StdVec<BrightnessLevel>,
    refreshes: StdVec<RefreshDirection>,
    init_count: usize,
    validated: usize,
}

#[derive(Clone, Default)]
struct FakePlatform(Rc<RefCell<PlatformState>>);

impl DisplayDriver for FakePlatform {
    fn init(&mut self) {
        self.0.borrow_mut().init_count += 1;
    }

    fn full_refresh(&mut self, direction: RefreshDirection) {
        self.0.borrow_mut().refreshes.push(direction);
    }
}

impl Backlight for FakePlatform {
    fn set_level(&mut self, level: BrightnessLevel) {
        self.0.borrow_mut().backlight.push(level);
    }
}

impl TouchPanel for FakePlatform {
    fn next_sample(&mut self) -> Option<TouchEvent> {
        self.0.borrow_mut().samples.pop_front()
    }
}

impl FirmwareValidator for FakePlatform {
    fn mark_valid(&mut self) {
        self.0.borrow_mut().validated += 1;
    }
}

#[derive(Default)]
struct ScreenLog {
    alive: usize,
    max_alive: usize,
    created: StdVec<ScreenId>,
    refreshed: StdVec<ScreenId>,
    touches: StdVec<(ScreenId, TouchEvent)>,
}

struct FakeScreen {
    id: ScreenId,
    log: Rc<RefCell<ScreenLog>>,
    consume_all: bool,
}

impl Screen for FakeScreen {
    fn refresh(&mut self) {
        self.log.borrow_mut().refreshed.push(self.id);
    }

    fn handle_touch(&mut self, event: TouchEvent) -> bool {
        self.log.borrow_mut().touches.push((self.id, event));
        self.consume_all
    }
}

impl Drop for FakeScreen {
    fn drop(&mut self) {
        self.log.borrow_mut().alive -= 1;
    }
}

struct FakeFactory {
    log: Rc<RefCell<ScreenLog>>,
    consume_all: bool,
}

impl ScreenFactory for FakeFactory {
    type Screen = FakeScreen;

    fn create(&mut self, id: ScreenId) -> FakeScreen {
        {
            let mut log = self.log.borrow_mut();
            log.alive += 1;
            log.max_alive = log.max_alive.max(log.alive);
            log.created.push(id);
        }
        FakeScreen {
            id,
            log: Rc::clone(&self.log),
            consume_all: self.consume_all,
        }
    }
}

#[derive(Clone, Default)]
struct FakeSystem(Rc<RefCell<StdVec<SystemRequest>>>);

impl SystemSink for FakeSystem {
    fn notify(&mut self, request: SystemRequest) {
        self.0.borrow_mut().push(request);
    }
}

type TestApp = WatchApp<FakePlatform, FakeFactory, FakeSystem>;

struct Harness {
    app: TestApp,
    platform: Rc<RefCell<PlatformState>>,
    screens: Rc<RefCell<ScreenLog>>,
    system: Rc<RefCell<StdVec<SystemRequest>>>,
}

fn config() -> WatchConfig {
    WatchConfig {
        idle_timeout_ms: 1_000,
        validation_window_ms: 5_000,
        ..WatchConfig::default()
    }
}

fn harness_with(consume_all: bool) -> Harness {
    let platform = FakePlatform::default();
    let platform_state = Rc::clone(&platform.0);
    let screens = Rc::new(RefCell::new(ScreenLog::default()));
    let factory = FakeFactory {
        log: Rc::clone(&screens),
        consume_all,
    };
    let system = FakeSystem::default();
    let system_log = Rc::clone(&system.0);

    let mut app = WatchApp::new(platform, factory, config());
    app.register(system);

    Harness {
        app,
        platform: platform_state,
        screens,
        system: system_log,
    }
}

fn harness() -> Harness {
    harness_with(false)
}

impl Harness {
    fn touch(&mut self, event: TouchEvent) {
        self.platform.borrow_mut().samples.push_back(event);
    }

    fn last_refresh(&self) -> Option<RefreshDirection> {
        self.platform.borrow().refreshes.last().copied()
    }

    fn last_backlight(&self) -> Option<BrightnessLevel> {
        self.platform.borrow().backlight.last().copied()
    }
}

#[test]
fn normal_boot_lands_on_clock_face() {
    let mut h = harness();
    h.app.start(BootError::None, 0);

    assert_eq!(h.app.current_screen_id(), ScreenId::Clock);
    assert_eq!(h.app.lifecycle_state(), LifecycleState::Running);
    assert!(!h.app.is_dimmed());
    assert_eq!(h.platform.borrow().init_count, 1);
    assert_eq!(h.last_backlight(), Some(BrightnessLevel::Medium));
    assert_eq!(h.screens.borrow().created, vec![ScreenId::Clock]);
}

#[test]
fn troubled_boot_lands_on_recovery_screen() {
    for boot_error in [
        BootError::FirmwareValidationFailed,
        BootError::TouchControllerUnresponsive,
    ] {
        let mut h = harness();
        h.app.start(boot_error, 0);
        assert_eq!(h.app.current_screen_id(), ScreenId::Error);
        assert_eq!(h.app.lifecycle_state(), LifecycleState::Running);
    }
}

#[test]
fn start_app_commits_on_next_cycle_with_direction() {
    let mut h = harness();
    h.app.start(BootError::None, 0);

    h.app.start_app(ScreenId::Settings, RefreshDirection::Left);
    // Nothing changes until the commit point.
    assert_eq!(h.app.current_screen_id(), ScreenId::Clock);

    h.app.process_cycle(100);
    assert_eq!(h.app.current_screen_id(), ScreenId::Settings);
    assert_eq!(h.last_refresh(), Some(RefreshDirection::Left));
}

#[test]
fn committed_screen_is_refreshed_in_the_same_cycle() {
    let mut h = harness();
    h.app.start(BootError::None, 0);

    h.app.start_app(ScreenId::Settings, RefreshDirection::Left);
    h.app.process_cycle(10);

    assert_eq!(h.app.current_screen_id(), ScreenId::Settings);
    // The incoming face gets drawn by the committing cycle, not the next one.
    assert_eq!(
        h.screens.borrow().refreshed.last(),
        Some(&ScreenId::Settings)
    );
}

#[test]
fn start_app_discards_navigation_history() {
    let mut h = harness();
    h.app.start(BootError::None, 0);

    h.app.dispatch_message(DisplayMessage::NewNotification, 10);
    h.app.process_cycle(20);
    assert_eq!(h.app.return_depth(), 1);

    h.app.start_app(ScreenId::QuickSettings, RefreshDirection::Down);
    h.app.process_cycle(30);
    assert_eq!(h.app.current_screen_id(), ScreenId::QuickSettings);
    assert_eq!(h.app.return_depth(), 0);
}

#[test]
fn forward_navigation_unwinds_in_reverse_order() {
    let mut h = harness();
    h.app.start(BootError::None, 0);

    h.app.dispatch_message(DisplayMessage::NewNotification, 10);
    h.app.process_cycle(20);
    h.app.dispatch_message(DisplayMessage::TimerDone, 30);
    h.app.process_cycle(40);
    assert_eq!(h.app.current_screen_id(), ScreenId::Timer);
    assert_eq!(h.app.return_depth(), 2);

    h.touch(TouchEvent::SwipeRight);
    h.app.process_cycle(50);
    assert_eq!(h.app.current_screen_id(), ScreenId::Notifications);
    // Return leg travels against the forward entry direction.
    assert_eq!(h.last_refresh(), Some(RefreshDirection::Down));

    h.touch(TouchEvent::SwipeRight);
    h.app.process_cycle(60);
    assert_eq!(h.app.current_screen_id(), ScreenId::Clock);
    assert_eq!(h.last_refresh(), Some(RefreshDirection::Up));
    assert_eq!(h.app.return_depth(), 0);
}

#[test]
fn back_gesture_on_empty_history_is_a_noop() {
    let mut h = harness();
    h.app.start(BootError::None, 0);
    let created_before = h.screens.borrow().created.len();

    h.touch(TouchEvent::SwipeRight);
    h.app.process_cycle(10);

    assert_eq!(h.app.current_screen_id(), ScreenId::Clock);
    assert_eq!(h.screens.borrow().created.len(), created_before);
    // The screen still saw the gesture before the router gave up on it.
    assert_eq!(
        h.screens.borrow().touches.last(),
        Some(&(ScreenId::Clock, TouchEvent::SwipeRight))
    );
}

#[test]
fn consumed_back_gesture_does_not_navigate() {
    let mut h = harness_with(true);
    h.app.start(BootError::None, 0);
    h.app.dispatch_message(DisplayMessage::NewNotification, 10);
    h.app.process_cycle(20);

    h.touch(TouchEvent::SwipeRight);
    h.app.process_cycle(30);

    assert_eq!(h.app.current_screen_id(), ScreenId::Notifications);
    assert_eq!(h.app.return_depth(), 1);
}

#[test]
fn history_depth_is_capped_without_breaking_navigation() {
    let mut h = harness();
    h.app.start(BootError::None, 0);

    let mut now = 0;
    for step in 0..RETURN_STACK_DEPTH + 1 {
        let message = if step % 2 == 0 {
            DisplayMessage::NewNotification
        } else {
            DisplayMessage::TimerDone
        };
        now += 10;
        h.app.dispatch_message(message, now);
        now += 10;
        h.app.process_cycle(now);
        assert!(h.app.return_depth() <= RETURN_STACK_DEPTH);
    }

    // The eleventh forward step was not recorded, but it still landed.
    assert_eq!(h.app.return_depth(), RETURN_STACK_DEPTH);
    assert_eq!(h.app.current_screen_id(), ScreenId::Notifications);
}

#[test]
fn exactly_one_screen_alive_across_commits() {
    let mut h = harness();
    h.app.start(BootError::None, 0);

    h.app.dispatch_message(DisplayMessage::NewNotification, 10);
    h.app.process_cycle(20);
    h.app.dispatch_message(DisplayMessage::TimerDone, 30);
    h.app.process_cycle(40);
    h.touch(TouchEvent::SwipeRight);
    h.app.process_cycle(50);

    let log = h.screens.borrow();
    assert_eq!(log.alive, 1);
    assert_eq!(log.max_alive, 1);
    assert_eq!(log.created.len(), 4);
}

#[test]
fn pending_navigation_last_request_wins() {
    let mut h = harness();
    h.app.start(BootError::None, 0);

    h.app.dispatch_message(DisplayMessage::NewNotification, 10);
    h.app.dispatch_message(DisplayMessage::TimerDone, 11);
    h.app.process_cycle(20);

    assert_eq!(h.app.current_screen_id(), ScreenId::Timer);
    // Only one construction happened for the two requests.
    assert_eq!(
        h.screens.borrow().created,
        vec![ScreenId::Clock, ScreenId::Timer]
    );
}

#[test]
fn set_full_refresh_redraws_without_navigating() {
    let mut h = harness();
    h.app.start(BootError::None, 0);
    let created_before = h.screens.borrow().created.len();

    h.app.set_full_refresh(RefreshDirection::RightAnim);
    h.app.process_cycle(10);

    assert_eq!(h.app.current_screen_id(), ScreenId::Clock);
    assert_eq!(h.screens.borrow().created.len(), created_before);
    assert_eq!(h.last_refresh(), Some(RefreshDirection::RightAnim));
}

#[test]
fn set_full_refresh_overrides_pending_direction() {
    let mut h = harness();
    h.app.start(BootError::None, 0);

    h.app.start_app(ScreenId::Settings, RefreshDirection::Left);
    h.app.set_full_refresh(RefreshDirection::Up);
    h.app.process_cycle(10);

    assert_eq!(h.app.current_screen_id(), ScreenId::Settings);
    assert_eq!(h.last_refresh(), Some(RefreshDirection::Up));
}

#[test]
fn idle_timeout_dims_and_touch_restores() {
    let mut h = harness();
    h.app.start(BootError::None, 0);

    h.app.process_cycle(500);
    assert_eq!(h.app.lifecycle_state(), LifecycleState::Running);
    assert!(!h.app.is_dimmed());

    h.app.process_cycle(1_000);
    assert_eq!(h.app.lifecycle_state(), LifecycleState::Idle);
    assert!(h.app.is_dimmed());
    assert_eq!(h.last_backlight(), Some(BrightnessLevel::Low));

    h.touch(TouchEvent::Tap);
    h.app.process_cycle(1_100);
    assert_eq!(h.app.lifecycle_state(), LifecycleState::Running);
    assert!(!h.app.is_dimmed());
    assert_eq!(h.last_backlight(), Some(BrightnessLevel::Medium));
}

#[test]
fn any_message_restarts_the_idle_window() {
    let mut h = harness();
    h.app.start(BootError::None, 0);

    // A kind this core ignores still counts as activity.
    h.app.dispatch_message(DisplayMessage::ChargingEvent, 900);
    h.app.process_cycle(1_500);
    assert_eq!(h.app.lifecycle_state(), LifecycleState::Running);

    h.app.process_cycle(1_900);
    assert_eq!(h.app.lifecycle_state(), LifecycleState::Idle);
}

#[test]
fn sleep_and_wake_messages_drive_brightness() {
    let mut h = harness();
    h.app.start(BootError::None, 0);

    h.app.dispatch_message(DisplayMessage::GoToSleep, 10);
    assert_eq!(h.app.lifecycle_state(), LifecycleState::Idle);
    assert!(h.app.is_dimmed());
    assert_eq!(h.last_backlight(), Some(BrightnessLevel::Low));

    h.app.dispatch_message(DisplayMessage::GoToRunning, 20);
    assert_eq!(h.app.lifecycle_state(), LifecycleState::Running);
    assert!(!h.app.is_dimmed());
    assert_eq!(h.last_backlight(), Some(BrightnessLevel::Medium));
}

#[test]
fn gesture_burst_coalesces_to_one_event() {
    let mut h = harness();
    h.app.start(BootError::None, 0);

    h.touch(TouchEvent::Tap);
    h.touch(TouchEvent::Tap);
    h.touch(TouchEvent::SwipeLeft);
    h.app.process_cycle(10);

    let log = h.screens.borrow();
    assert_eq!(log.touches.len(), 1);
    assert_eq!(log.touches[0], (ScreenId::Clock, TouchEvent::SwipeLeft));
}

#[test]
fn button_on_clock_requests_sleep() {
    let mut h = harness();
    h.app.start(BootError::None, 0);

    h.app.dispatch_message(DisplayMessage::ButtonPushed, 10);
    assert_eq!(h.system.borrow().as_slice(), &[SystemRequest::GoToSleep]);
    assert_eq!(h.app.current_screen_id(), ScreenId::Clock);
}

#[test]
fn button_elsewhere_returns_to_clock_as_fresh_context() {
    let mut h = harness();
    h.app.start(BootError::None, 0);
    h.app.dispatch_message(DisplayMessage::NewNotification, 10);
    h.app.process_cycle(20);

    h.app.dispatch_message(DisplayMessage::ButtonPushed, 30);
    h.app.process_cycle(40);

    assert_eq!(h.app.current_screen_id(), ScreenId::Clock);
    assert_eq!(h.app.return_depth(), 0);
    assert!(h.system.borrow().is_empty());
}

#[test]
fn long_tap_on_quick_settings_toggles_ble_radio() {
    let mut h = harness();
    h.app.start(BootError::None, 0);
    h.app.start_app(ScreenId::QuickSettings, RefreshDirection::Down);
    h.app.process_cycle(10);

    h.touch(TouchEvent::LongTap);
    h.app.process_cycle(20);

    assert_eq!(
        h.system.borrow().as_slice(),
        &[SystemRequest::ToggleBleRadio]
    );
    assert_eq!(h.app.current_screen_id(), ScreenId::QuickSettings);
}

#[test]
fn consumed_long_tap_does_not_toggle_the_radio() {
    let mut h = harness_with(true);
    h.app.start(BootError::None, 0);
    h.app.start_app(ScreenId::QuickSettings, RefreshDirection::Down);
    h.app.process_cycle(10);

    h.touch(TouchEvent::LongTap);
    h.app.process_cycle(20);

    assert!(h.system.borrow().is_empty());
}

#[test]
fn long_tap_elsewhere_leaves_the_radio_alone() {
    let mut h = harness();
    h.app.start(BootError::None, 0);

    h.touch(TouchEvent::LongTap);
    h.app.process_cycle(10);

    assert!(h.system.borrow().is_empty());
}

#[test]
fn firmware_marked_valid_after_boot_window() {
    let mut h = harness();
    h.app.start(BootError::None, 0);

    h.app.process_cycle(4_999);
    assert_eq!(h.platform.borrow().validated, 0);

    h.app.process_cycle(5_000);
    assert_eq!(h.platform.borrow().validated, 1);

    h.app.process_cycle(9_000);
    assert_eq!(h.platform.borrow().validated, 1);
}

#[test]
fn no_validation_window_after_troubled_boot() {
    let mut h = harness();
    h.app.start(BootError::FirmwareValidationFailed, 0);

    h.app.process_cycle(60_000);
    assert_eq!(h.platform.borrow().validated, 0);
}

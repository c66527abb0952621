impl<P, SF, SYS> WatchApp<P, SF, SYS>
where
    P: DisplayDriver + Backlight + TouchPanel + FirmwareValidator,
    SF: ScreenFactory,
    SYS: SystemSink,
{
    pub fn new(platform: P, screens: SF, config: WatchConfig) -> Self {
        Self {
            platform,
            screens,
            system: None,
            config,
            state: LifecycleState::Idle,
            is_dimmed: true,
            last_activity_ms: 0,
            current: None,
            current_id: ScreenId::None,
            pending: None,
            forced_refresh: None,
            return_stack: Vec::new(),
            validation_due_ms: None,
        }
    }

    /// Startup sequencing: hardware init, boot-error-driven initial screen
    /// selection and arming of the firmware-validation window. Called once
    /// before the message loop starts.
    pub fn start(&mut self, boot_error: BootError, now_ms: u64) {
        self.platform.init();
        self.last_activity_ms = now_ms;
        self.state = LifecycleState::Running;

        let initial = match boot_error {
            BootError::None => {
                // The image only proves itself by staying up through the
                // boot window; a reset before then reverts on the host side.
                self.validation_due_ms = Some(now_ms + self.config.validation_window_ms);
                ScreenId::Clock
            }
            BootError::TouchControllerUnresponsive | BootError::FirmwareValidationFailed => {
                ScreenId::Error
            }
        };
        info!("start: boot_error={:?}, initial screen {:?}", boot_error, initial);

        self.current = Some(self.screens.create(initial));
        self.current_id = initial;
        self.apply_brightness();
    }

    /// Binds the outbound channel to the host system task.
    pub fn register(&mut self, system: SYS) {
        self.system = Some(system);
    }

    pub fn lifecycle_state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_dimmed(&self) -> bool {
        self.is_dimmed
    }

    pub fn current_screen_id(&self) -> ScreenId {
        self.current_id
    }

    /// Handles one inbound message. Kinds this core does not act on are
    /// ignored so producers can grow the message set without breaking it.
    pub fn dispatch_message(&mut self, message: DisplayMessage, now_ms: u64) {
        self.note_activity(now_ms);

        match message {
            DisplayMessage::GoToRunning | DisplayMessage::RestoreBrightness => self.wake(),
            DisplayMessage::GoToSleep | DisplayMessage::DimScreen => self.dim(),
            DisplayMessage::NewNotification => {
                if self.current_id != ScreenId::Notifications {
                    self.load_screen(ScreenId::Notifications, RefreshDirection::Down);
                }
            }
            DisplayMessage::TimerDone => {
                if self.current_id != ScreenId::Timer {
                    self.load_screen(ScreenId::Timer, RefreshDirection::Up);
                }
            }
            DisplayMessage::AlarmTriggered => {
                if self.current_id != ScreenId::Alarm {
                    self.start_app(ScreenId::Alarm, RefreshDirection::None);
                }
            }
            DisplayMessage::ButtonPushed => {
                if self.current_id == ScreenId::Clock {
                    self.push_to_system_task(SystemRequest::GoToSleep);
                } else {
                    // The side button always lands on the clock face, as a
                    // fresh context rather than a history walk.
                    self.start_app(ScreenId::Clock, RefreshDirection::Up);
                }
            }
            // Status-bar data; the current screen picks it up on refresh.
            _ => {}
        }
    }

    /// One housekeeping cycle, run when no message arrived within the
    /// receive window: touch routing, dimming, validation, the single
    /// navigation commit point, then a refresh of the active screen so a
    /// committed navigation is drawn in the same cycle.
    pub fn process_cycle(&mut self, now_ms: u64) {
        self.route_touch(now_ms);
        self.check_idle(now_ms);
        self.check_firmware_validation(now_ms);
        self.commit_pending();
        if let Some(screen) = self.current.as_mut() {
            screen.refresh();
        }
    }

    fn check_firmware_validation(&mut self, now_ms: u64) {
        if let Some(due) = self.validation_due_ms
            && now_ms >= due
        {
            info!("boot window survived, marking firmware image valid");
            self.platform.mark_valid();
            self.validation_due_ms = None;
        }
    }

    /// Fire-and-forget; the host task outlives this component.
    fn push_to_system_task(&mut self, request: SystemRequest) {
        debug!("system task <- {:?}", request);
        if let Some(system) = self.system.as_mut() {
            system.notify(request);
        }
    }
}

impl<P, SF, SYS> WatchApp<P, SF, SYS>
where
    P: DisplayDriver + Backlight + TouchPanel + FirmwareValidator,
    SF: ScreenFactory,
    SYS: SystemSink,
{
    /// Any touch or dispatched message restarts the idle window and pulls
    /// the lifecycle back to `Running`; brightness itself is restored on
    /// the next cycle.
    fn note_activity(&mut self, now_ms: u64) {
        self.last_activity_ms = now_ms;
        if self.state == LifecycleState::Idle {
            self.state = LifecycleState::Running;
        }
    }

    /// Computes the effective brightness from configuration and lifecycle
    /// state and writes it to the backlight.
    fn apply_brightness(&mut self) {
        let level = match self.state {
            LifecycleState::Running => self.config.active_brightness,
            LifecycleState::Idle => self.config.dimmed_brightness,
        };
        self.platform.set_level(level);
        self.is_dimmed = self.state == LifecycleState::Idle;
    }

    /// Periodic dimming check. An idle window elapsing uninterrupted lowers
    /// the backlight until the next touch or message.
    fn check_idle(&mut self, now_ms: u64) {
        if self.state == LifecycleState::Running
            && now_ms.saturating_sub(self.last_activity_ms) >= self.config.idle_timeout_ms
        {
            debug!("idle for {}ms, dimming", self.config.idle_timeout_ms);
            self.state = LifecycleState::Idle;
        }

        if self.is_dimmed != (self.state == LifecycleState::Idle) {
            self.apply_brightness();
        }
    }

    fn wake(&mut self) {
        if self.state != LifecycleState::Running {
            self.state = LifecycleState::Running;
        }
        self.apply_brightness();
    }

    fn dim(&mut self) {
        if self.state != LifecycleState::Idle {
            self.state = LifecycleState::Idle;
            self.apply_brightness();
        }
    }
}

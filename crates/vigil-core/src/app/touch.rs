impl<P, SF, SYS> WatchApp<P, SF, SYS>
where
    P: DisplayDriver + Backlight + TouchPanel + FirmwareValidator,
    SF: ScreenFactory,
    SYS: SystemSink,
{
    /// Polls the touch controller once per cycle. A burst of samples from
    /// one physical gesture coalesces into a single event; the latest
    /// classification wins. Nothing is queued across cycles.
    fn take_gesture(&mut self) -> TouchEvent {
        let mut event = TouchEvent::None;
        while let Some(sample) = self.platform.next_sample() {
            if sample != TouchEvent::None {
                event = sample;
            }
        }
        event
    }

    /// Offers the cycle's gesture to the active screen first. Unconsumed
    /// gestures fall through to the router: a back gesture pops one level
    /// of navigation history, and a long press on the quick-settings
    /// screen toggles the BLE radio.
    fn route_touch(&mut self, now_ms: u64) {
        let event = self.take_gesture();
        if event == TouchEvent::None {
            return;
        }
        self.note_activity(now_ms);

        let consumed = match self.current.as_mut() {
            Some(screen) => screen.handle_touch(event),
            None => false,
        };
        if consumed {
            return;
        }
        if event.is_back_gesture() {
            self.navigate_back();
        } else if event == TouchEvent::LongTap && self.current_id == ScreenId::QuickSettings {
            self.push_to_system_task(SystemRequest::ToggleBleRadio);
        }
    }
}

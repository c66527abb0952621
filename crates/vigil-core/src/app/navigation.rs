impl<P, SF, SYS> WatchApp<P, SF, SYS>
where
    P: DisplayDriver + Backlight + TouchPanel + FirmwareValidator,
    SF: ScreenFactory,
    SYS: SystemSink,
{
    /// Requests a screen change that enters a fresh top-level context,
    /// discarding back-navigation history. Takes effect at the next commit.
    pub fn start_app(&mut self, screen_id: ScreenId, direction: RefreshDirection) {
        self.load_new_screen(screen_id, direction);
    }

    /// Overrides the animation direction of the next commit without
    /// changing the target screen. With no navigation pending this forces
    /// a full redraw of the current screen on the next cycle.
    pub fn set_full_refresh(&mut self, direction: RefreshDirection) {
        self.forced_refresh = Some(direction);
    }

    fn load_new_screen(&mut self, screen_id: ScreenId, direction: RefreshDirection) {
        self.return_stack.clear();
        self.set_pending(screen_id, direction);
    }

    /// Forward step: the current screen becomes the place to return to,
    /// travelling against the entry direction.
    fn load_screen(&mut self, screen_id: ScreenId, direction: RefreshDirection) {
        let entry = NavigationEntry {
            screen_id: self.current_id,
            direction: direction.reverse(),
        };
        if self.return_stack.push(entry).is_err() {
            // History depth is capped; the navigation itself still happens.
            debug!("return stack full, not recording {:?}", entry.screen_id);
        }
        self.set_pending(screen_id, direction);
    }

    fn navigate_back(&mut self) {
        match self.return_stack.pop() {
            Some(entry) => self.set_pending(entry.screen_id, entry.direction),
            None => debug!("back gesture with empty history, staying on {:?}", self.current_id),
        }
    }

    // Single pending slot; the latest request within a cycle wins.
    fn set_pending(&mut self, screen_id: ScreenId, direction: RefreshDirection) {
        let fresh = PendingNavigation { screen_id, direction };
        if let Some(stale) = self.pending.replace(fresh) {
            debug!("pending navigation to {:?} superseded by {:?}", stale.screen_id, screen_id);
        }
    }

    /// Applies at most one navigation per cycle. The outgoing screen is
    /// torn down completely before the replacement is constructed, so the
    /// two are never alive at the same time.
    fn commit_pending(&mut self) {
        let Some(nav) = self.pending.take() else {
            if let Some(direction) = self.forced_refresh.take() {
                self.platform.full_refresh(direction);
            }
            return;
        };

        let direction = self.forced_refresh.take().unwrap_or(nav.direction);
        debug!("screen {:?} -> {:?} ({:?})", self.current_id, nav.screen_id, direction);

        self.current = None;
        self.platform.full_refresh(direction);
        self.current = Some(self.screens.create(nav.screen_id));
        self.current_id = nav.screen_id;
    }

    #[cfg(test)]
    fn return_depth(&self) -> usize {
        self.return_stack.len()
    }
}

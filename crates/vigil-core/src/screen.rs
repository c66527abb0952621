//! Screen capability surface: identities, transition vectors, gestures.

/// Identifies a screen variant the navigator can construct.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ScreenId {
    #[default]
    None,
    Clock,
    Notifications,
    Timer,
    Alarm,
    QuickSettings,
    Settings,
    Error,
}

/// Animation vector applied when the active screen changes.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum RefreshDirection {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
    LeftAnim,
    RightAnim,
}

impl RefreshDirection {
    /// Vector used when travelling back along a recorded forward step.
    pub fn reverse(self) -> Self {
        match self {
            Self::None => Self::None,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::LeftAnim => Self::RightAnim,
            Self::RightAnim => Self::LeftAnim,
        }
    }
}

/// One discrete classified gesture, delivered at most once per cycle.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TouchEvent {
    #[default]
    None,
    Tap,
    DoubleTap,
    LongTap,
    SwipeUp,
    SwipeDown,
    SwipeLeft,
    SwipeRight,
}

impl TouchEvent {
    /// The gesture that pops one level of navigation history when the
    /// active screen leaves it unconsumed.
    pub fn is_back_gesture(self) -> bool {
        self == Self::SwipeRight
    }
}

/// The active view. Exclusively owned by the navigator; replaced as a
/// whole on every committed navigation.
pub trait Screen {
    fn refresh(&mut self);

    /// Returns `true` when the screen consumed the gesture.
    fn handle_touch(&mut self, event: TouchEvent) -> bool;
}

/// Constructs screen variants by id. All construction of the current
/// screen goes through the navigator's commit point.
pub trait ScreenFactory {
    type Screen: Screen;

    fn create(&mut self, id: ScreenId) -> Self::Screen;
}

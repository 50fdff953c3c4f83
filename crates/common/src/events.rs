use glam::Vec2;

/// Keys the demo reacts to. Anything else maps to `Other` and falls through
/// to the default (no-op) handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Up,
    Down,
    Left,
    Right,
    Escape,
    BracketLeft,
    BracketRight,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Primary,
    Secondary,
    Other,
}

/// Raw input notifications delivered by the host event feed.
///
/// Positions are window-space pixels; wheel deltas keep the host convention
/// of 1/8-degree angular units (120 per detent) and raw pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyPressed(Key),
    KeyReleased(Key),
    MousePressed { button: MouseButton, position: Vec2 },
    MouseMoved { position: Vec2 },
    Wheel { angle_delta: f32, pixel_delta: f32 },
}

/// Surface lifecycle notifications delivered by the host event feed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceEvent {
    /// The surface became visible and may be drawn to.
    Exposed,
    /// The surface is no longer visible; rendering must be skipped.
    Obscured,
    /// The surface changed size. Dimensions are physical pixels.
    Resized {
        width: u32,
        height: u32,
        scale_factor: f64,
    },
    /// A previously scheduled deferred frame request was delivered.
    FrameDelivered,
    /// The window is closing; GPU teardown must happen now.
    CloseRequested,
}

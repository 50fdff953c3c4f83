/// Camera movement direction controlled by a held key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
}

/// A high-level action produced by the input router.
///
/// The scene consumes the camera and blend actions; the host consumes the
/// pointer and close actions. Neither layer sees raw input events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Set or clear one movement flag.
    SetMovement { direction: Direction, active: bool },
    /// Rotate the camera by anchor-relative pixel offsets.
    Look { dx: f32, dy: f32 },
    /// Adjust the texture blend scalar by a signed delta.
    AdjustBlend(f32),
    /// Post a deferred close notification on the host feed.
    RequestClose,
    /// Move the pointer back to the mouse-look anchor.
    RecenterPointer,
    /// Show or hide the pointer glyph.
    SetCursorVisible(bool),
}

use crate::action::{Action, Direction};
use cubefield_common::{InputEvent, Key, MouseButton};
use glam::Vec2;

/// Blend step for one wheel detent: (120 / 120) / 25.
const WHEEL_ANGLE_DIVISOR: f32 = 120.0 * 25.0;
const WHEEL_PIXEL_DIVISOR: f32 = 250.0;
const BRACKET_BLEND_STEP: f32 = 0.05;

/// Translates raw key/mouse/wheel events into actions.
///
/// Owns the mouse-look toggle and the pointer anchor; while mouse-look is
/// active every consumed motion event is followed by a pointer recenter so
/// relative motion is unbounded.
#[derive(Debug)]
pub struct InputRouter {
    mouse_look: bool,
    anchor: Vec2,
}

impl InputRouter {
    pub fn new(anchor: Vec2) -> Self {
        Self {
            mouse_look: false,
            anchor,
        }
    }

    /// Screen-space point the pointer is reset to between motion events.
    pub fn set_anchor(&mut self, anchor: Vec2) {
        self.anchor = anchor;
    }

    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    pub fn mouse_look_active(&self) -> bool {
        self.mouse_look
    }

    pub fn route(&mut self, event: InputEvent) -> Vec<Action> {
        match event {
            InputEvent::KeyPressed(key) => self.key_event(key, true),
            InputEvent::KeyReleased(key) => self.key_event(key, false),
            InputEvent::MousePressed { button, .. } => self.mouse_pressed(button),
            InputEvent::MouseMoved { position } => self.mouse_moved(position),
            InputEvent::Wheel {
                angle_delta,
                pixel_delta,
            } => Self::wheel(angle_delta, pixel_delta),
        }
    }

    fn key_event(&mut self, key: Key, pressed: bool) -> Vec<Action> {
        if let Some(direction) = movement_direction(key) {
            return vec![Action::SetMovement {
                direction,
                active: pressed,
            }];
        }
        if !pressed {
            return Vec::new();
        }
        match key {
            Key::Escape => vec![Action::RequestClose],
            Key::BracketLeft => vec![Action::AdjustBlend(-BRACKET_BLEND_STEP)],
            Key::BracketRight => vec![Action::AdjustBlend(BRACKET_BLEND_STEP)],
            _ => Vec::new(),
        }
    }

    fn mouse_pressed(&mut self, button: MouseButton) -> Vec<Action> {
        if button != MouseButton::Primary {
            return Vec::new();
        }
        self.mouse_look = !self.mouse_look;
        vec![
            Action::RecenterPointer,
            Action::SetCursorVisible(!self.mouse_look),
        ]
    }

    fn mouse_moved(&mut self, position: Vec2) -> Vec<Action> {
        if !self.mouse_look {
            return Vec::new();
        }
        if position == self.anchor {
            // The recentring itself reports a motion event back; ignore it.
            return Vec::new();
        }
        let offset = position - self.anchor;
        vec![
            Action::Look {
                dx: offset.x,
                dy: offset.y,
            },
            Action::RecenterPointer,
        ]
    }

    fn wheel(angle_delta: f32, pixel_delta: f32) -> Vec<Action> {
        if angle_delta != 0.0 {
            return vec![Action::AdjustBlend(angle_delta / WHEEL_ANGLE_DIVISOR)];
        }
        if pixel_delta != 0.0 {
            return vec![Action::AdjustBlend(pixel_delta / WHEEL_PIXEL_DIVISOR)];
        }
        Vec::new()
    }
}

fn movement_direction(key: Key) -> Option<Direction> {
    match key {
        Key::W | Key::Up => Some(Direction::Forward),
        Key::S | Key::Down => Some(Direction::Backward),
        Key::A | Key::Left => Some(Direction::Left),
        Key::D | Key::Right => Some(Direction::Right),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> InputRouter {
        InputRouter::new(Vec2::new(400.0, 300.0))
    }

    #[test]
    fn letter_and_arrow_keys_map_to_the_same_directions() {
        let mut r = router();
        for (letter, arrow, direction) in [
            (Key::W, Key::Up, Direction::Forward),
            (Key::S, Key::Down, Direction::Backward),
            (Key::A, Key::Left, Direction::Left),
            (Key::D, Key::Right, Direction::Right),
        ] {
            for key in [letter, arrow] {
                assert_eq!(
                    r.route(InputEvent::KeyPressed(key)),
                    vec![Action::SetMovement {
                        direction,
                        active: true
                    }]
                );
                assert_eq!(
                    r.route(InputEvent::KeyReleased(key)),
                    vec![Action::SetMovement {
                        direction,
                        active: false
                    }]
                );
            }
        }
    }

    #[test]
    fn escape_requests_a_deferred_close() {
        let mut r = router();
        assert_eq!(
            r.route(InputEvent::KeyPressed(Key::Escape)),
            vec![Action::RequestClose]
        );
        assert!(r.route(InputEvent::KeyReleased(Key::Escape)).is_empty());
    }

    #[test]
    fn brackets_step_the_blend_scalar() {
        let mut r = router();
        assert_eq!(
            r.route(InputEvent::KeyPressed(Key::BracketLeft)),
            vec![Action::AdjustBlend(-0.05)]
        );
        assert_eq!(
            r.route(InputEvent::KeyPressed(Key::BracketRight)),
            vec![Action::AdjustBlend(0.05)]
        );
    }

    #[test]
    fn one_wheel_detent_adjusts_blend_by_0_04() {
        let mut r = router();
        let actions = r.route(InputEvent::Wheel {
            angle_delta: 120.0,
            pixel_delta: 0.0,
        });
        assert_eq!(actions, vec![Action::AdjustBlend(0.04)]);
    }

    #[test]
    fn pixel_scroll_is_used_only_without_angular_delta() {
        let mut r = router();
        assert_eq!(
            r.route(InputEvent::Wheel {
                angle_delta: 0.0,
                pixel_delta: 125.0,
            }),
            vec![Action::AdjustBlend(0.5)]
        );
        assert_eq!(
            r.route(InputEvent::Wheel {
                angle_delta: 60.0,
                pixel_delta: 125.0,
            }),
            vec![Action::AdjustBlend(0.02)]
        );
        assert!(r
            .route(InputEvent::Wheel {
                angle_delta: 0.0,
                pixel_delta: 0.0,
            })
            .is_empty());
    }

    #[test]
    fn primary_press_toggles_mouse_look() {
        let mut r = router();
        let on = r.route(InputEvent::MousePressed {
            button: MouseButton::Primary,
            position: Vec2::ZERO,
        });
        assert!(r.mouse_look_active());
        assert_eq!(
            on,
            vec![Action::RecenterPointer, Action::SetCursorVisible(false)]
        );

        let off = r.route(InputEvent::MousePressed {
            button: MouseButton::Primary,
            position: Vec2::ZERO,
        });
        assert!(!r.mouse_look_active());
        assert_eq!(
            off,
            vec![Action::RecenterPointer, Action::SetCursorVisible(true)]
        );
    }

    #[test]
    fn secondary_press_falls_through() {
        let mut r = router();
        assert!(r
            .route(InputEvent::MousePressed {
                button: MouseButton::Secondary,
                position: Vec2::ZERO,
            })
            .is_empty());
        assert!(!r.mouse_look_active());
    }

    #[test]
    fn motion_is_ignored_until_mouse_look_is_active() {
        let mut r = router();
        assert!(r
            .route(InputEvent::MouseMoved {
                position: Vec2::new(410.0, 290.0)
            })
            .is_empty());
    }

    #[test]
    fn motion_yields_anchor_relative_look_then_recenter() {
        let mut r = router();
        r.route(InputEvent::MousePressed {
            button: MouseButton::Primary,
            position: Vec2::ZERO,
        });
        let actions = r.route(InputEvent::MouseMoved {
            position: Vec2::new(410.0, 290.0),
        });
        assert_eq!(
            actions,
            vec![Action::Look { dx: 10.0, dy: -10.0 }, Action::RecenterPointer]
        );
    }

    #[test]
    fn motion_at_the_anchor_is_swallowed() {
        let mut r = router();
        r.route(InputEvent::MousePressed {
            button: MouseButton::Primary,
            position: Vec2::ZERO,
        });
        assert!(r
            .route(InputEvent::MouseMoved {
                position: Vec2::new(400.0, 300.0)
            })
            .is_empty());
    }

    #[test]
    fn unbound_keys_produce_no_actions() {
        let mut r = router();
        assert!(r.route(InputEvent::KeyPressed(Key::Other)).is_empty());
        assert!(r.route(InputEvent::KeyReleased(Key::Other)).is_empty());
    }
}

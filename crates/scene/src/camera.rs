use cubefield_common::clamp;
use cubefield_input::Direction;
use glam::{Mat4, Vec3};

const MOVE_SPEED: f32 = 2.5;
const LOOK_SENSITIVITY: f32 = 0.05;
const PITCH_LIMIT_DEGREES: f32 = 89.0;

/// Held-key movement flags, one per direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementFlags {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl MovementFlags {
    pub fn set(&mut self, direction: Direction, active: bool) {
        match direction {
            Direction::Forward => self.forward = active,
            Direction::Backward => self.backward = active,
            Direction::Left => self.left = active,
            Direction::Right => self.right = active,
        }
    }

    pub fn any(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }
}

/// Fly camera over (position, yaw, pitch, movement flags).
///
/// Angles are degrees. `front` is always unit length and a deterministic
/// function of (yaw, pitch); the view matrix is recomputed eagerly on every
/// mutation, never cached across them.
#[derive(Debug, Clone)]
pub struct CameraController {
    position: Vec3,
    yaw: f32,
    pitch: f32,
    up: Vec3,
    front: Vec3,
    view: Mat4,
    flags: MovementFlags,
}

impl CameraController {
    pub fn new() -> Self {
        let mut camera = Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            yaw: -90.0,
            pitch: 0.0,
            up: Vec3::Y,
            front: Vec3::NEG_Z,
            view: Mat4::IDENTITY,
            flags: MovementFlags::default(),
        };
        camera.update_front();
        camera
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn flags(&self) -> MovementFlags {
        self.flags
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    pub fn set_movement(&mut self, direction: Direction, active: bool) {
        self.flags.set(direction, active);
    }

    /// Integrate held-key movement over the frame delta time.
    ///
    /// Each axis pair moves only when exactly one of its flags is active;
    /// contradictory or empty pairs leave the position untouched.
    pub fn integrate(&mut self, delta_time: f32) {
        if !self.flags.any() {
            return;
        }
        let forward_move = self.flags.forward != self.flags.backward;
        let strafe_move = self.flags.left != self.flags.right;
        if !forward_move && !strafe_move {
            return;
        }
        let speed = MOVE_SPEED * delta_time;
        if forward_move {
            let front_speed = if self.flags.forward { speed } else { -speed };
            self.position += front_speed * self.front;
        }
        if strafe_move {
            let strafe_speed = if self.flags.right { speed } else { -speed };
            self.position += strafe_speed * self.front.cross(self.up).normalize();
        }
        self.update_view();
    }

    /// Apply anchor-relative pixel offsets from mouse-look motion.
    pub fn look(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * LOOK_SENSITIVITY;
        self.pitch = clamp(
            -PITCH_LIMIT_DEGREES,
            self.pitch + dy * LOOK_SENSITIVITY,
            PITCH_LIMIT_DEGREES,
        );
        self.update_front();
    }

    fn update_front(&mut self) {
        let (sin_yaw, cos_yaw) = self.yaw.to_radians().sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.to_radians().sin_cos();
        // Screen-space y grows downward, hence the inverted pitch term.
        self.front = Vec3::new(cos_yaw * cos_pitch, -sin_pitch, sin_yaw * cos_pitch).normalize();
        self.update_view();
    }

    fn update_view(&mut self) {
        self.view = Mat4::look_at_rh(self.position, self.position + self.front, self.up);
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn expected_view(camera: &CameraController) -> Mat4 {
        Mat4::look_at_rh(
            camera.position(),
            camera.position() + camera.front(),
            Vec3::Y,
        )
    }

    #[test]
    fn defaults_look_down_negative_z() {
        let camera = CameraController::new();
        assert!(camera.position().abs_diff_eq(Vec3::new(0.0, 0.0, 3.0), EPSILON));
        assert!(camera.front().abs_diff_eq(Vec3::NEG_Z, EPSILON));
        assert_eq!(camera.yaw(), -90.0);
        assert_eq!(camera.pitch(), 0.0);
    }

    #[test]
    fn front_is_always_unit_length() {
        let mut camera = CameraController::new();
        for (dx, dy) in [(123.0, -45.0), (-360.0, 200.0), (7.5, 7.5)] {
            camera.look(dx, dy);
            assert!((camera.front().length() - 1.0).abs() < EPSILON);
        }
    }

    #[test]
    fn forward_for_one_second_moves_2_5_units() {
        let mut camera = CameraController::new();
        camera.set_movement(Direction::Forward, true);
        camera.integrate(1.0);
        assert!(camera
            .position()
            .abs_diff_eq(Vec3::new(0.0, 0.0, 0.5), EPSILON));
    }

    #[test]
    fn zero_delta_time_leaves_position_unchanged() {
        let mut camera = CameraController::new();
        camera.set_movement(Direction::Forward, true);
        camera.set_movement(Direction::Right, true);
        camera.integrate(0.0);
        assert!(camera
            .position()
            .abs_diff_eq(Vec3::new(0.0, 0.0, 3.0), EPSILON));
    }

    #[test]
    fn contradictory_flags_cancel_out() {
        let mut camera = CameraController::new();
        camera.set_movement(Direction::Forward, true);
        camera.set_movement(Direction::Backward, true);
        camera.integrate(1.0);
        assert!(camera
            .position()
            .abs_diff_eq(Vec3::new(0.0, 0.0, 3.0), EPSILON));

        camera.set_movement(Direction::Left, true);
        camera.set_movement(Direction::Right, true);
        camera.integrate(1.0);
        assert!(camera
            .position()
            .abs_diff_eq(Vec3::new(0.0, 0.0, 3.0), EPSILON));
    }

    #[test]
    fn strafe_moves_along_the_normalized_right_axis() {
        let mut camera = CameraController::new();
        camera.set_movement(Direction::Right, true);
        camera.integrate(1.0);
        // front = -Z, up = +Y, so right = +X.
        assert!(camera
            .position()
            .abs_diff_eq(Vec3::new(2.5, 0.0, 3.0), EPSILON));
    }

    #[test]
    fn pitch_clamps_at_89_degrees() {
        let mut camera = CameraController::new();
        camera.look(0.0, 10_000.0);
        assert_eq!(camera.pitch(), 89.0);
        camera.look(0.0, -100_000.0);
        assert_eq!(camera.pitch(), -89.0);
    }

    #[test]
    fn yaw_is_unbounded() {
        let mut camera = CameraController::new();
        camera.look(10_000.0, 0.0);
        assert_eq!(camera.yaw(), -90.0 + 10_000.0 * 0.05);
    }

    #[test]
    fn looking_down_inverts_the_pitch_term() {
        let mut camera = CameraController::new();
        // Positive dy (pointer moved down) must drop the front vector.
        camera.look(0.0, 100.0);
        assert!(camera.front().y < 0.0);
    }

    #[test]
    fn view_matrix_tracks_every_mutation() {
        let mut camera = CameraController::new();
        assert!(camera.view_matrix().abs_diff_eq(expected_view(&camera), EPSILON));

        camera.look(33.0, -12.0);
        assert!(camera.view_matrix().abs_diff_eq(expected_view(&camera), EPSILON));

        camera.set_movement(Direction::Backward, true);
        camera.integrate(0.25);
        assert!(camera.view_matrix().abs_diff_eq(expected_view(&camera), EPSILON));
    }
}

//! Input mapping: key state and mouse deltas to transform changes
//!
//! Movement is a fixed step along the yaw-rotated forward/right axes; mouse
//! deltas turn into yaw and camera pitch. Jumps raise the avatar by one step
//! and lower it again on a fire-once timer - a second jump before the first
//! timer fires stacks on top of it instead of cancelling it.

use std::f32::consts::FRAC_PI_2;

use super::view::ArenaView;

/// World units moved per input tick
pub const MOVE_STEP: f32 = 0.2;

/// Radians of yaw/pitch per pixel of mouse movement
pub const MOUSE_SENSITIVITY: f32 = 0.002;

/// Seconds a jump keeps the avatar raised
pub const JUMP_DURATION: f32 = 0.5;

/// Keys held this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

impl KeyState {
    pub fn any(&self) -> bool {
        self.forward || self.back || self.left || self.right
    }
}

/// Per-client input state: camera pitch and the pending jump timers
#[derive(Debug, Default)]
pub struct InputController {
    /// Camera pitch in radians, clamped to straight up/down
    pub pitch: f32,
    /// Seconds remaining until each pending jump lowers the avatar again
    jump_reverts: Vec<f32>,
}

impl InputController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one tick of held keys to the self transform.
    pub fn step_movement(&self, view: &mut ArenaView, keys: &KeyState) {
        let (sin, cos) = view.rotation_y.sin_cos();

        if keys.forward {
            view.x -= sin * MOVE_STEP;
            view.z -= cos * MOVE_STEP;
        }
        if keys.back {
            view.x += sin * MOVE_STEP;
            view.z += cos * MOVE_STEP;
        }
        if keys.left {
            view.x -= cos * MOVE_STEP;
            view.z += sin * MOVE_STEP;
        }
        if keys.right {
            view.x += cos * MOVE_STEP;
            view.z -= sin * MOVE_STEP;
        }
    }

    /// Apply a mouse delta: yaw on the avatar, pitch on the camera.
    pub fn look(&mut self, view: &mut ArenaView, dx: f32, dy: f32) {
        view.rotation_y -= dx * MOUSE_SENSITIVITY;
        self.pitch = (self.pitch - dy * MOUSE_SENSITIVITY).clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    /// Start a jump: up now, down when the timer fires.
    pub fn start_jump(&mut self, view: &mut ArenaView) {
        view.y += MOVE_STEP;
        self.jump_reverts.push(JUMP_DURATION);
    }

    /// Advance the jump timers; every expired one lowers the avatar a step.
    pub fn tick(&mut self, view: &mut ArenaView, dt: f32) {
        let mut expired = 0;
        self.jump_reverts.retain_mut(|remaining| {
            *remaining -= dt;
            if *remaining <= 0.0 {
                expired += 1;
                false
            } else {
                true
            }
        });
        view.y -= expired as f32 * MOVE_STEP;
    }

    /// Direction the camera faces, from yaw and pitch.
    pub fn aim_direction(&self, view: &ArenaView) -> (f32, f32, f32) {
        let (yaw_sin, yaw_cos) = view.rotation_y.sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.sin_cos();
        (-yaw_sin * pitch_cos, pitch_sin, -yaw_cos * pitch_cos)
    }
}

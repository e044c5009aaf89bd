//! Bot steering policies for headless clients
//!
//! A `Pilot` decides, tick by tick, what the session should pretend the
//! human did: keys held, mouse movement, jumping, shooting. The session
//! turns those into move/shoot traffic exactly like a rendering client
//! would.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::input::KeyState;

/// What the pilot "did" this tick
#[derive(Debug, Clone, Copy, Default)]
pub struct PilotAction {
    pub keys: KeyState,
    /// Mouse delta in pixels (x, y)
    pub look: (f32, f32),
    pub jump: bool,
    pub shoot: bool,
}

pub trait Pilot: Send {
    fn tick(&mut self, dt: f32) -> PilotAction;
}

/// Walks forward, drifts its aim, fires and hops on randomized cooldowns
pub struct WanderPilot {
    rng: ChaCha8Rng,
    /// Pixels of mouse drift per tick, resampled with each shot
    turn_drift: f32,
    shoot_cooldown: f32,
    jump_cooldown: f32,
}

impl WanderPilot {
    pub fn new(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let turn_drift = rng.gen_range(-3.0..3.0);
        Self {
            rng,
            turn_drift,
            shoot_cooldown: 1.0,
            jump_cooldown: 4.0,
        }
    }
}

impl Pilot for WanderPilot {
    fn tick(&mut self, dt: f32) -> PilotAction {
        let mut action = PilotAction {
            keys: KeyState {
                forward: true,
                ..Default::default()
            },
            look: (self.turn_drift, 0.0),
            ..Default::default()
        };

        self.shoot_cooldown -= dt;
        if self.shoot_cooldown <= 0.0 {
            action.shoot = true;
            self.shoot_cooldown = self.rng.gen_range(0.5..3.0);
            self.turn_drift = self.rng.gen_range(-3.0..3.0);
        }

        self.jump_cooldown -= dt;
        if self.jump_cooldown <= 0.0 {
            action.jump = true;
            self.jump_cooldown = self.rng.gen_range(3.0..8.0);
        }

        action
    }
}

//! Headless presentation client
//!
//! Everything a drawing client does except the drawing: the local mirror of
//! the arena, advisory bullet simulation, input-to-transform mapping, and
//! the async session that speaks the wire protocol. The `bots` binary runs
//! swarms of these against a live relay.

pub mod bullet;
pub mod input;
pub mod pilot;
pub mod session;
pub mod view;

pub use bullet::{BulletPool, BULLET_LIFETIME, BULLET_STEP, HIT_RADIUS};
pub use input::{InputController, KeyState, JUMP_DURATION, MOUSE_SENSITIVITY, MOVE_STEP};
pub use pilot::{Pilot, PilotAction, WanderPilot};
pub use session::{run_session, SessionStats, TICK_HZ};
pub use view::{ArenaView, RemoteAvatar};

//! Advisory client-side projectiles
//!
//! Every client simulates every announced bullet locally: fixed step along
//! the fired direction each tick, a distance check against the known remote
//! avatars, and a hard lifetime after which the bullet disappears whether or
//! not it hit anything. A hit only *reports* - the server applies damage on
//! the client's word.

use uuid::Uuid;

use crate::ws::protocol::BulletFiredMsg;

use super::view::ArenaView;

/// World units a bullet travels per render tick
pub const BULLET_STEP: f32 = 0.5;

/// Distance at which a bullet counts as a hit
pub const HIT_RADIUS: f32 = 1.0;

/// Seconds before a bullet self-destructs
pub const BULLET_LIFETIME: f32 = 2.0;

/// One in-flight projectile
#[derive(Debug, Clone)]
pub struct Bullet {
    pub shooter: Uuid,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    dir_x: f32,
    dir_y: f32,
    dir_z: f32,
    /// Seconds of flight remaining
    ttl: f32,
}

impl Bullet {
    pub fn from_fired(msg: &BulletFiredMsg) -> Self {
        Self {
            shooter: msg.player_id,
            x: msg.x,
            y: msg.y,
            z: msg.z,
            dir_x: msg.direction_x,
            dir_y: msg.direction_y,
            dir_z: msg.direction_z,
            ttl: BULLET_LIFETIME,
        }
    }

    fn advance(&mut self) {
        self.x += self.dir_x * BULLET_STEP;
        self.y += self.dir_y * BULLET_STEP;
        self.z += self.dir_z * BULLET_STEP;
    }

    /// First remote avatar within the hit radius, excluding the shooter
    fn find_hit(&self, view: &ArenaView) -> Option<Uuid> {
        for (id, avatar) in &view.remotes {
            if *id == self.shooter {
                continue;
            }
            let dx = self.x - avatar.x;
            let dy = self.y - avatar.y;
            let dz = self.z - avatar.z;
            if dx * dx + dy * dy + dz * dz < HIT_RADIUS * HIT_RADIUS {
                return Some(*id);
            }
        }
        None
    }
}

/// All bullets this client is currently simulating
#[derive(Debug, Default)]
pub struct BulletPool {
    bullets: Vec<Bullet>,
}

impl BulletPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, msg: &BulletFiredMsg) {
        self.bullets.push(Bullet::from_fired(msg));
    }

    pub fn len(&self) -> usize {
        self.bullets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bullets.is_empty()
    }

    /// Advance every bullet one tick. Returns the ids to report as hit;
    /// bullets that hit or expired are removed.
    pub fn tick(&mut self, dt: f32, view: &ArenaView) -> Vec<Uuid> {
        let mut hits = Vec::new();

        self.bullets.retain_mut(|bullet| {
            bullet.advance();
            bullet.ttl -= dt;

            if let Some(target) = bullet.find_hit(view) {
                hits.push(target);
                return false;
            }

            bullet.ttl > 0.0
        });

        hits
    }
}

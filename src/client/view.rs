//! Client-side mirror of the arena
//!
//! `ArenaView` is the non-rendering half of the presentation client: the
//! local transform for "self" plus a roster of remote avatars, kept up to
//! date purely from server broadcasts. Remote transforms snap to whatever
//! the last `playerMoved` said - no interpolation. The mirror is best-effort
//! and eventually consistent; unknown ids are ignored.

use std::collections::HashMap;

use rand::Rng;
use uuid::Uuid;

use crate::game::{MAX_HEALTH, SPAWN_HEIGHT};
use crate::ws::protocol::{InitGameMsg, MoveMsg, ServerMsg};

/// Last-known transform of a remote player; stands in for the renderable
/// handle a drawing client would keep.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteAvatar {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub rotation_y: f32,
}

/// The local mirror: self state, map size, remote roster
#[derive(Debug, Clone)]
pub struct ArenaView {
    pub self_id: Uuid,
    pub map_size: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub rotation_y: f32,
    pub health: i32,
    pub score: u32,
    pub remotes: HashMap<Uuid, RemoteAvatar>,
}

impl ArenaView {
    /// Build the mirror from the joining snapshot.
    pub fn from_init(init: &InitGameMsg) -> Self {
        let mut view = Self {
            self_id: init.id,
            map_size: init.map_size,
            x: 0.0,
            y: SPAWN_HEIGHT,
            z: 0.0,
            rotation_y: 0.0,
            health: MAX_HEALTH,
            score: 0,
            remotes: HashMap::new(),
        };

        for (id, p) in &init.players {
            if *id == init.id {
                view.x = p.x;
                view.y = p.y;
                view.z = p.z;
                view.rotation_y = p.rotation_y;
                view.health = p.health;
                view.score = p.score;
            } else {
                view.remotes.insert(
                    *id,
                    RemoteAvatar {
                        x: p.x,
                        y: p.y,
                        z: p.z,
                        rotation_y: p.rotation_y,
                    },
                );
            }
        }

        view
    }

    /// Apply one server broadcast. Returns the move report that must be sent
    /// when the event forced a local respawn, `None` otherwise.
    pub fn apply(&mut self, msg: &ServerMsg, rng: &mut impl Rng) -> Option<MoveMsg> {
        match msg {
            // The snapshot is handled by `from_init`; a stray one is ignored.
            ServerMsg::InitGame(_) => None,

            ServerMsg::PlayerJoined(joined) => {
                if joined.id != self.self_id {
                    self.remotes.insert(
                        joined.id,
                        RemoteAvatar {
                            x: joined.x,
                            y: joined.y,
                            z: joined.z,
                            rotation_y: joined.rotation_y,
                        },
                    );
                }
                None
            }

            ServerMsg::PlayerLeft(left) => {
                self.remotes.remove(&left.id);
                None
            }

            ServerMsg::PlayerMoved(moved) => {
                if let Some(avatar) = self.remotes.get_mut(&moved.id) {
                    avatar.x = moved.x;
                    avatar.y = moved.y;
                    avatar.z = moved.z;
                    avatar.rotation_y = moved.rotation_y;
                }
                None
            }

            // Bullets live in the projectile pool, not the mirror.
            ServerMsg::BulletFired(_) => None,

            ServerMsg::PlayerKilled(killed) => {
                if killed.id == self.self_id {
                    Some(self.respawn(rng))
                } else {
                    if killed.killer_id == self.self_id {
                        self.score += 1;
                    }
                    None
                }
            }

            ServerMsg::PlayerDamaged(damaged) => {
                if damaged.id == self.self_id {
                    self.health = damaged.health;
                }
                None
            }

            ServerMsg::ScoreUpdated(update) => {
                if update.id == self.self_id {
                    self.score = update.score;
                }
                None
            }
        }
    }

    /// Pick a fresh random position within the map bounds and report it.
    fn respawn(&mut self, rng: &mut impl Rng) -> MoveMsg {
        let half = self.map_size / 2.0;
        self.x = rng.gen_range(-half..half);
        self.y = SPAWN_HEIGHT;
        self.z = rng.gen_range(-half..half);

        MoveMsg {
            x: self.x,
            y: self.y,
            z: self.z,
            rotation_y: self.rotation_y,
        }
    }

    /// The move report for the current self transform.
    pub fn move_report(&self) -> MoveMsg {
        MoveMsg {
            x: self.x,
            y: self.y,
            z: self.z,
            rotation_y: self.rotation_y,
        }
    }
}

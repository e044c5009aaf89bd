//! Player registry and per-event relay logic
//!
//! The registry is the process-wide map from connection id to player state.
//! It is owned by the relay task and only ever touched from there, so every
//! handler runs to completion before the next - no locking.
//!
//! The handlers are deliberately trusting: positions, hit reports and rates
//! arrive from clients and are applied as-is. The only guards are the ones
//! that keep the process alive (unknown ids are a no-op, never a fault).

use std::collections::HashMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};
use uuid::Uuid;

use crate::ws::protocol::{
    BulletFiredMsg, ClientMsg, HitMsg, InitGameMsg, MoveMsg, PlayerDamagedMsg, PlayerJoinedMsg,
    PlayerKilledMsg, PlayerLeftMsg, PlayerMovedMsg, PlayerWire, ScoreUpdatedMsg, ServerMsg,
    ShootMsg,
};

use super::relay::Outbound;

/// Health every player spawns and respawns with
pub const MAX_HEALTH: i32 = 100;

/// Health removed per reported hit
pub const HIT_DAMAGE: i32 = 20;

/// Fixed spawn height above the arena floor
pub const SPAWN_HEIGHT: f32 = 1.0;

/// Server-side state for one connected player
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Yaw in radians
    pub rotation_y: f32,
    /// Health (0-100 intended; never validated against client input)
    pub health: i32,
    pub score: u32,
}

impl PlayerState {
    fn spawned(x: f32, z: f32) -> Self {
        Self {
            x,
            y: SPAWN_HEIGHT,
            z,
            rotation_y: 0.0,
            health: MAX_HEALTH,
            score: 0,
        }
    }

    pub fn wire(&self) -> PlayerWire {
        PlayerWire {
            x: self.x,
            y: self.y,
            z: self.z,
            rotation_y: self.rotation_y,
            health: self.health,
            score: self.score,
        }
    }
}

/// The process-wide player map plus the spawn RNG and the fixed map size
pub struct PlayerRegistry {
    players: HashMap<Uuid, PlayerState>,
    map_size: f32,
    rng: ChaCha8Rng,
}

impl PlayerRegistry {
    pub fn new(map_size: f32, rng_seed: Option<u64>) -> Self {
        let rng = match rng_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            players: HashMap::new(),
            map_size,
            rng,
        }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn get(&self, conn_id: &Uuid) -> Option<&PlayerState> {
        self.players.get(conn_id)
    }

    /// Uniform spawn over [-map_size/2, map_size/2) on x/z, fixed height
    fn spawn_position(&mut self) -> (f32, f32) {
        let half = self.map_size / 2.0;
        let x = self.rng.gen_range(-half..half);
        let z = self.rng.gen_range(-half..half);
        (x, z)
    }

    /// Route one inbound client message to its handler
    pub fn dispatch(&mut self, conn_id: Uuid, msg: ClientMsg) -> Vec<Outbound> {
        match msg {
            ClientMsg::Join => self.handle_join(conn_id),
            ClientMsg::Move(m) => self.handle_move(conn_id, m),
            ClientMsg::Shoot(s) => self.handle_shoot(conn_id, s),
            ClientMsg::Hit(h) => self.handle_hit(conn_id, h),
        }
    }

    /// Register the connection with a fresh random spawn. The joiner gets the
    /// full snapshot (itself included); everyone else gets `playerJoined`.
    /// A repeated join re-registers with a new spawn.
    pub fn handle_join(&mut self, conn_id: Uuid) -> Vec<Outbound> {
        let (x, z) = self.spawn_position();
        let player = PlayerState::spawned(x, z);
        let joined = PlayerJoinedMsg {
            id: conn_id,
            x: player.x,
            y: player.y,
            z: player.z,
            rotation_y: player.rotation_y,
            health: player.health,
            score: player.score,
        };
        self.players.insert(conn_id, player);

        info!(conn_id = %conn_id, players_online = self.players.len(), "Player joined");

        let snapshot: HashMap<Uuid, PlayerWire> = self
            .players
            .iter()
            .map(|(id, p)| (*id, p.wire()))
            .collect();

        vec![
            Outbound::to(
                conn_id,
                ServerMsg::InitGame(InitGameMsg {
                    id: conn_id,
                    players: snapshot,
                    map_size: self.map_size,
                }),
            ),
            Outbound::except(conn_id, ServerMsg::PlayerJoined(joined)),
        ]
    }

    /// Overwrite the caller's transform with whatever it reported and tell
    /// everyone else. A move from an unregistered connection is dropped.
    pub fn handle_move(&mut self, conn_id: Uuid, m: MoveMsg) -> Vec<Outbound> {
        let Some(player) = self.players.get_mut(&conn_id) else {
            debug!(conn_id = %conn_id, "Move from unregistered connection, dropping");
            return Vec::new();
        };
        player.x = m.x;
        player.y = m.y;
        player.z = m.z;
        player.rotation_y = m.rotation_y;

        vec![Outbound::except(
            conn_id,
            ServerMsg::PlayerMoved(PlayerMovedMsg {
                id: conn_id,
                x: m.x,
                y: m.y,
                z: m.z,
                rotation_y: m.rotation_y,
            }),
        )]
    }

    /// Stateless fan-out of a fired bullet, shooter included
    pub fn handle_shoot(&mut self, conn_id: Uuid, s: ShootMsg) -> Vec<Outbound> {
        vec![Outbound::all(ServerMsg::BulletFired(BulletFiredMsg {
            player_id: conn_id,
            x: s.x,
            y: s.y,
            z: s.z,
            direction_x: s.direction_x,
            direction_y: s.direction_y,
            direction_z: s.direction_z,
        }))]
    }

    /// Apply an advisory hit report. The target loses a fixed amount of
    /// health; at zero it is respawned with full health and the caller is
    /// credited with the kill. Unknown target or unregistered caller: no-op.
    pub fn handle_hit(&mut self, conn_id: Uuid, h: HitMsg) -> Vec<Outbound> {
        if !self.players.contains_key(&conn_id) {
            debug!(conn_id = %conn_id, "Hit from unregistered connection, dropping");
            return Vec::new();
        }
        let Some(target) = self.players.get_mut(&h.id) else {
            debug!(conn_id = %conn_id, target = %h.id, "Hit against unknown target, dropping");
            return Vec::new();
        };

        target.health -= HIT_DAMAGE;
        let killed = target.health <= 0;

        let mut events = Vec::new();

        if killed {
            // Credit the caller first; caller and target may be the same
            // connection, so the borrows stay sequential.
            if let Some(shooter) = self.players.get_mut(&conn_id) {
                shooter.score += 1;
            }
            events.push(Outbound::all(ServerMsg::PlayerKilled(PlayerKilledMsg {
                id: h.id,
                killer_id: conn_id,
            })));

            let (x, z) = self.spawn_position();
            if let Some(target) = self.players.get_mut(&h.id) {
                target.health = MAX_HEALTH;
                target.x = x;
                target.y = SPAWN_HEIGHT;
                target.z = z;
            }

            info!(target = %h.id, killer = %conn_id, "Player killed");
        }

        // Damaged carries the target's state as it is now - after a kill
        // that is the respawned health and position.
        let target = &self.players[&h.id];
        events.push(Outbound::all(ServerMsg::PlayerDamaged(PlayerDamagedMsg {
            id: h.id,
            health: target.health,
            x: target.x,
            y: target.y,
            z: target.z,
        })));

        if killed {
            let score = self.players[&conn_id].score;
            events.push(Outbound::all(ServerMsg::ScoreUpdated(ScoreUpdatedMsg {
                id: conn_id,
                score,
            })));
        }

        events
    }

    /// Drop the connection's state; announce the departure only if there was
    /// a registered player to remove.
    pub fn handle_disconnect(&mut self, conn_id: Uuid) -> Vec<Outbound> {
        if self.players.remove(&conn_id).is_none() {
            return Vec::new();
        }
        info!(conn_id = %conn_id, players_online = self.players.len(), "Player left");
        vec![Outbound::all(ServerMsg::PlayerLeft(PlayerLeftMsg {
            id: conn_id,
        }))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::relay::Scope;

    fn test_registry() -> PlayerRegistry {
        PlayerRegistry::new(100.0, Some(12345))
    }

    fn join(reg: &mut PlayerRegistry) -> Uuid {
        let id = Uuid::new_v4();
        reg.handle_join(id);
        id
    }

    #[test]
    fn join_sends_snapshot_to_joiner_and_announces_to_others() {
        let mut reg = test_registry();
        let first = join(&mut reg);
        let second = Uuid::new_v4();
        let events = reg.handle_join(second);

        assert_eq!(events.len(), 2);

        match (&events[0].scope, &events[0].msg) {
            (Scope::To(id), ServerMsg::InitGame(init)) => {
                assert_eq!(*id, second);
                assert_eq!(init.id, second);
                assert_eq!(init.map_size, 100.0);
                // Snapshot is exactly the registered set, self included
                assert_eq!(init.players.len(), 2);
                assert!(init.players.contains_key(&first));
                assert!(init.players.contains_key(&second));
            }
            other => panic!("Expected InitGame to joiner, got {:?}", other),
        }

        match (&events[1].scope, &events[1].msg) {
            (Scope::Except(id), ServerMsg::PlayerJoined(joined)) => {
                assert_eq!(*id, second);
                assert_eq!(joined.id, second);
                assert_eq!(joined.health, MAX_HEALTH);
                assert_eq!(joined.score, 0);
            }
            other => panic!("Expected PlayerJoined broadcast, got {:?}", other),
        }
    }

    #[test]
    fn spawns_stay_within_map_bounds() {
        let mut reg = test_registry();
        for _ in 0..1000 {
            let id = join(&mut reg);
            let p = reg.get(&id).unwrap();
            assert!(p.x >= -50.0 && p.x <= 50.0, "x out of bounds: {}", p.x);
            assert!(p.z >= -50.0 && p.z <= 50.0, "z out of bounds: {}", p.z);
            assert_eq!(p.y, SPAWN_HEIGHT);
            reg.handle_disconnect(id);
        }
    }

    #[test]
    fn move_overwrites_state_and_excludes_sender() {
        let mut reg = test_registry();
        let id = join(&mut reg);
        let events = reg.handle_move(
            id,
            MoveMsg {
                x: 3.0,
                y: 1.0,
                z: -7.5,
                rotation_y: 1.25,
            },
        );

        let p = reg.get(&id).unwrap();
        assert_eq!((p.x, p.y, p.z, p.rotation_y), (3.0, 1.0, -7.5, 1.25));

        assert_eq!(events.len(), 1);
        match (&events[0].scope, &events[0].msg) {
            (Scope::Except(excluded), ServerMsg::PlayerMoved(moved)) => {
                assert_eq!(*excluded, id);
                assert_eq!(moved.id, id);
                assert_eq!(moved.rotation_y, 1.25);
            }
            other => panic!("Expected PlayerMoved except sender, got {:?}", other),
        }
    }

    #[test]
    fn move_before_join_is_a_noop() {
        let mut reg = test_registry();
        let ghost = Uuid::new_v4();
        let events = reg.handle_move(
            ghost,
            MoveMsg {
                x: 1.0,
                y: 1.0,
                z: 1.0,
                rotation_y: 0.0,
            },
        );
        assert!(events.is_empty());
        assert!(reg.get(&ghost).is_none());
    }

    #[test]
    fn repeated_identical_moves_are_idempotent() {
        let mut reg = test_registry();
        let id = join(&mut reg);
        let m = MoveMsg {
            x: 2.0,
            y: 1.0,
            z: 2.0,
            rotation_y: 0.5,
        };
        let first = reg.handle_move(id, m.clone());
        let state_after_first = reg.get(&id).unwrap().clone();
        let second = reg.handle_move(id, m);

        assert_eq!(reg.get(&id).unwrap(), &state_after_first);
        match (&first[0].msg, &second[0].msg) {
            (ServerMsg::PlayerMoved(a), ServerMsg::PlayerMoved(b)) => {
                assert_eq!((a.x, a.y, a.z, a.rotation_y), (b.x, b.y, b.z, b.rotation_y));
            }
            _ => panic!("Expected two PlayerMoved broadcasts"),
        }
    }

    #[test]
    fn shoot_is_stateless_and_reaches_everyone() {
        let mut reg = test_registry();
        // Not even registered - the relay rebroadcasts regardless.
        let shooter = Uuid::new_v4();
        let events = reg.handle_shoot(
            shooter,
            ShootMsg {
                x: 0.0,
                y: 2.5,
                z: 0.0,
                direction_x: 0.0,
                direction_y: 0.0,
                direction_z: -1.0,
            },
        );
        assert_eq!(events.len(), 1);
        match (&events[0].scope, &events[0].msg) {
            (Scope::All, ServerMsg::BulletFired(b)) => {
                assert_eq!(b.player_id, shooter);
                assert_eq!(b.direction_z, -1.0);
            }
            other => panic!("Expected BulletFired to all, got {:?}", other),
        }
    }

    #[test]
    fn nonlethal_hit_damages_and_broadcasts_once() {
        let mut reg = test_registry();
        let shooter = join(&mut reg);
        let target = join(&mut reg);

        let events = reg.handle_hit(shooter, HitMsg { id: target });

        assert_eq!(reg.get(&target).unwrap().health, 80);
        assert_eq!(reg.get(&shooter).unwrap().score, 0);
        assert_eq!(events.len(), 1);
        match (&events[0].scope, &events[0].msg) {
            (Scope::All, ServerMsg::PlayerDamaged(d)) => {
                assert_eq!(d.id, target);
                assert_eq!(d.health, 80);
            }
            other => panic!("Expected PlayerDamaged to all, got {:?}", other),
        }
    }

    #[test]
    fn lethal_hit_respawns_credits_and_orders_broadcasts() {
        let mut reg = test_registry();
        let shooter = join(&mut reg);
        let target = join(&mut reg);

        // Grind the target down to 20 health
        for _ in 0..4 {
            reg.handle_hit(shooter, HitMsg { id: target });
        }
        assert_eq!(reg.get(&target).unwrap().health, 20);
        let old_pos = {
            let t = reg.get(&target).unwrap();
            (t.x, t.z)
        };

        let events = reg.handle_hit(shooter, HitMsg { id: target });

        let t = reg.get(&target).unwrap();
        assert_eq!(t.health, MAX_HEALTH);
        assert!(t.x >= -50.0 && t.x <= 50.0);
        assert!(t.z >= -50.0 && t.z <= 50.0);
        assert_ne!((t.x, t.z), old_pos, "kill should respawn the target");
        assert_eq!(reg.get(&shooter).unwrap().score, 1);

        // Order: killed, damaged, scoreUpdated - all broadcast to everyone
        assert_eq!(events.len(), 3);
        match &events[0].msg {
            ServerMsg::PlayerKilled(k) => {
                assert_eq!(k.id, target);
                assert_eq!(k.killer_id, shooter);
            }
            other => panic!("Expected PlayerKilled first, got {:?}", other),
        }
        match &events[1].msg {
            ServerMsg::PlayerDamaged(d) => {
                // Post-respawn values
                assert_eq!(d.health, MAX_HEALTH);
                assert_eq!((d.x, d.z), (t.x, t.z));
            }
            other => panic!("Expected PlayerDamaged second, got {:?}", other),
        }
        match &events[2].msg {
            ServerMsg::ScoreUpdated(s) => {
                assert_eq!(s.id, shooter);
                assert_eq!(s.score, 1);
            }
            other => panic!("Expected ScoreUpdated third, got {:?}", other),
        }
        for e in &events {
            assert!(matches!(e.scope, Scope::All));
        }
    }

    #[test]
    fn hit_against_unknown_target_is_a_noop() {
        let mut reg = test_registry();
        let shooter = join(&mut reg);
        let events = reg.handle_hit(shooter, HitMsg { id: Uuid::new_v4() });
        assert!(events.is_empty());
        assert_eq!(reg.get(&shooter).unwrap().score, 0);
    }

    #[test]
    fn hit_from_unregistered_caller_is_a_noop() {
        let mut reg = test_registry();
        let target = join(&mut reg);
        let events = reg.handle_hit(Uuid::new_v4(), HitMsg { id: target });
        assert!(events.is_empty());
        assert_eq!(reg.get(&target).unwrap().health, MAX_HEALTH);
    }

    #[test]
    fn self_hit_is_allowed_and_self_kill_scores() {
        let mut reg = test_registry();
        let id = join(&mut reg);
        for _ in 0..5 {
            reg.handle_hit(id, HitMsg { id });
        }
        let p = reg.get(&id).unwrap();
        assert_eq!(p.health, MAX_HEALTH);
        assert_eq!(p.score, 1);
    }

    #[test]
    fn disconnect_removes_and_announces_registered_players_only() {
        let mut reg = test_registry();
        let id = join(&mut reg);

        let events = reg.handle_disconnect(id);
        assert_eq!(reg.len(), 0);
        assert_eq!(events.len(), 1);
        match &events[0].msg {
            ServerMsg::PlayerLeft(left) => assert_eq!(left.id, id),
            other => panic!("Expected PlayerLeft, got {:?}", other),
        }

        // Subsequent move from the departed connection is dropped
        let after = reg.handle_move(
            id,
            MoveMsg {
                x: 0.0,
                y: 1.0,
                z: 0.0,
                rotation_y: 0.0,
            },
        );
        assert!(after.is_empty());

        // A connection that never joined leaves silently
        assert!(reg.handle_disconnect(Uuid::new_v4()).is_empty());
    }
}

//! WebSocket protocol message definitions
//! These are the wire types for client-server communication

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Player state as it appears on the wire (values in an `initGame` map,
/// fields of `playerJoined`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerWire {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Yaw in radians
    pub rotation_y: f32,
    /// Health (0-100)
    pub health: i32,
    pub score: u32,
}

/// Messages sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMsg {
    /// Register with the arena; the server replies with `initGame`
    Join,

    /// Report the caller's own transform (trusted as-is)
    Move(MoveMsg),

    /// Announce a fired bullet; hit detection stays client-side
    Shoot(ShootMsg),

    /// Advisory hit report against another player
    Hit(HitMsg),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveMsg {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub rotation_y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShootMsg {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub direction_x: f32,
    pub direction_y: f32,
    pub direction_z: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitMsg {
    /// Target player (any registered id; the reporter is trusted)
    pub id: Uuid,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMsg {
    /// Full arena snapshot, sent to a joining connection only
    InitGame(InitGameMsg),

    /// A new player registered (sent to everyone but the joiner)
    PlayerJoined(PlayerJoinedMsg),

    /// A player's connection went away
    PlayerLeft(PlayerLeftMsg),

    /// A player reported a new transform (sent to everyone but the mover)
    PlayerMoved(PlayerMovedMsg),

    /// A bullet was fired (sent to everyone including the shooter)
    BulletFired(BulletFiredMsg),

    /// A hit dropped the target to zero health
    PlayerKilled(PlayerKilledMsg),

    /// A hit landed; carries the target's current health and position
    PlayerDamaged(PlayerDamagedMsg),

    /// A killer's score changed
    ScoreUpdated(ScoreUpdatedMsg),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitGameMsg {
    /// The joining connection's own id
    pub id: Uuid,
    /// Every registered player, the joiner included
    pub players: HashMap<Uuid, PlayerWire>,
    pub map_size: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerJoinedMsg {
    pub id: Uuid,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub rotation_y: f32,
    pub health: i32,
    pub score: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerLeftMsg {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerMovedMsg {
    pub id: Uuid,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub rotation_y: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulletFiredMsg {
    pub player_id: Uuid,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub direction_x: f32,
    pub direction_y: f32,
    pub direction_z: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerKilledMsg {
    pub id: Uuid,
    pub killer_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDamagedMsg {
    pub id: Uuid,
    pub health: i32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreUpdatedMsg {
    pub id: Uuid,
    pub score: u32,
}

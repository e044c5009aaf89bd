//! Relay task - serialized command handling and broadcast fan-out
//!
//! One task owns the `PlayerRegistry`. Connections push `RelayCommand`s
//! through an mpsc channel and the task handles each to completion before
//! the next, which is the whole concurrency story: no locks, no interleaved
//! mutation. Outbound envelopes go through a broadcast channel that every
//! connection's writer subscribes to; delivery is fire-and-forget and a slow
//! consumer simply lags.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tracing::info;
use uuid::Uuid;

use crate::ws::protocol::{ClientMsg, ServerMsg};

use super::registry::PlayerRegistry;

/// Which connections an outbound message is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Every open connection
    All,
    /// Every connection but this one
    Except(Uuid),
    /// Exactly this connection
    To(Uuid),
}

impl Scope {
    /// Whether a connection with the given id should receive the message
    pub fn covers(&self, conn_id: Uuid) -> bool {
        match self {
            Scope::All => true,
            Scope::Except(excluded) => *excluded != conn_id,
            Scope::To(only) => *only == conn_id,
        }
    }
}

/// A server message plus its delivery scope
#[derive(Debug, Clone)]
pub struct Outbound {
    pub scope: Scope,
    pub msg: ServerMsg,
}

impl Outbound {
    pub fn all(msg: ServerMsg) -> Self {
        Self {
            scope: Scope::All,
            msg,
        }
    }

    pub fn except(conn_id: Uuid, msg: ServerMsg) -> Self {
        Self {
            scope: Scope::Except(conn_id),
            msg,
        }
    }

    pub fn to(conn_id: Uuid, msg: ServerMsg) -> Self {
        Self {
            scope: Scope::To(conn_id),
            msg,
        }
    }
}

/// Commands from connection handlers to the relay task
#[derive(Debug)]
pub enum RelayCommand {
    /// A parsed client message from an open connection
    Inbound { conn_id: Uuid, msg: ClientMsg },
    /// The connection closed (client close, transport error, or task end)
    Disconnect { conn_id: Uuid },
}

/// Cloneable handle to a running relay task
#[derive(Clone)]
pub struct RelayHandle {
    pub cmd_tx: mpsc::Sender<RelayCommand>,
    events_tx: broadcast::Sender<Outbound>,
    players_online: Arc<AtomicUsize>,
}

impl RelayHandle {
    /// Wire up the channels and spawn the relay task.
    pub fn spawn(map_size: f32, rng_seed: Option<u64>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(256);
        let (events_tx, _) = broadcast::channel(256);
        let players_online = Arc::new(AtomicUsize::new(0));

        tokio::spawn(run_relay(
            cmd_rx,
            events_tx.clone(),
            players_online.clone(),
            map_size,
            rng_seed,
        ));

        Self {
            cmd_tx,
            events_tx,
            players_online,
        }
    }

    /// Subscribe to the broadcast stream. Must happen before the
    /// connection's first command is sent or the reply to it can be missed.
    pub fn subscribe(&self) -> broadcast::Receiver<Outbound> {
        self.events_tx.subscribe()
    }

    pub fn players_online(&self) -> usize {
        self.players_online.load(Ordering::Relaxed)
    }
}

/// Run the relay loop. Exits when every command sender is gone.
pub async fn run_relay(
    mut cmd_rx: mpsc::Receiver<RelayCommand>,
    events_tx: broadcast::Sender<Outbound>,
    players_online: Arc<AtomicUsize>,
    map_size: f32,
    rng_seed: Option<u64>,
) {
    let mut registry = PlayerRegistry::new(map_size, rng_seed);
    info!(map_size, "Relay started");

    while let Some(cmd) = cmd_rx.recv().await {
        let events = match cmd {
            RelayCommand::Inbound { conn_id, msg } => registry.dispatch(conn_id, msg),
            RelayCommand::Disconnect { conn_id } => registry.handle_disconnect(conn_id),
        };

        players_online.store(registry.len(), Ordering::Relaxed);

        for event in events {
            // A send error only means no connection is subscribed right now.
            let _ = events_tx.send(event);
        }
    }

    info!("Relay stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_covers_the_right_connections() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        assert!(Scope::All.covers(a));
        assert!(Scope::All.covers(b));

        assert!(!Scope::Except(a).covers(a));
        assert!(Scope::Except(a).covers(b));

        assert!(Scope::To(a).covers(a));
        assert!(!Scope::To(a).covers(b));
    }

    #[tokio::test]
    async fn relay_task_routes_commands_and_counts_players() {
        let handle = RelayHandle::spawn(100.0, Some(7));
        let mut rx = handle.subscribe();

        let conn_id = Uuid::new_v4();
        handle
            .cmd_tx
            .send(RelayCommand::Inbound {
                conn_id,
                msg: ClientMsg::Join,
            })
            .await
            .unwrap();

        // First envelope is the snapshot addressed to the joiner
        let out = rx.recv().await.unwrap();
        assert_eq!(out.scope, Scope::To(conn_id));
        assert!(matches!(out.msg, ServerMsg::InitGame(_)));
        // Second is the announcement for everyone else
        let out = rx.recv().await.unwrap();
        assert_eq!(out.scope, Scope::Except(conn_id));

        // The counter is updated after the join was handled
        assert_eq!(handle.players_online(), 1);

        handle
            .cmd_tx
            .send(RelayCommand::Disconnect { conn_id })
            .await
            .unwrap();
        let out = rx.recv().await.unwrap();
        assert!(matches!(out.msg, ServerMsg::PlayerLeft(_)));
        assert_eq!(handle.players_online(), 0);
    }
}

//! Arena Game Server - relay server for a minimal multiplayer arena shooter
//!
//! The server keeps a process-wide registry of connected players and fans
//! client-submitted events (move/shoot/hit) out to every open connection.
//! There is no authoritative simulation: clients report their own state and
//! the relay trusts it.
//!
//! The `client` module is the headless half of the presentation client
//! (remote-player mirror, advisory bullets, input mapping), used by the
//! `bots` binary and the integration tests.

pub mod app;
pub mod client;
pub mod config;
pub mod game;
pub mod http;
pub mod util;
pub mod ws;

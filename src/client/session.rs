//! Headless client session
//!
//! Connects to a relay, joins, and then runs the same cooperative loop a
//! rendering client would: network events and a fixed render tick
//! interleaved on one task, mutating the local mirror directly. A `Pilot`
//! stands in for the human.

use std::time::Duration;

use anyhow::{Context, Result};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use crate::ws::protocol::{ClientMsg, HitMsg, ServerMsg, ShootMsg};

use super::bullet::BulletPool;
use super::input::InputController;
use super::pilot::Pilot;
use super::view::ArenaView;

/// Render ticks per second the headless loop simulates
pub const TICK_HZ: u32 = 60;

/// Bullets leave from eye height above the avatar origin
const SHOOT_HEIGHT: f32 = 1.5;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;

/// Counters a finished session reports back
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionStats {
    pub events_received: u64,
    pub moves_sent: u64,
    pub shots_sent: u64,
    pub hits_sent: u64,
    pub kills: u64,
    pub deaths: u64,
}

/// Run one client against the relay at `url` until `duration` elapses or
/// the connection drops. Returns the traffic counters.
pub async fn run_session(
    url: &str,
    pilot: &mut dyn Pilot,
    duration: Duration,
    seed: u64,
) -> Result<SessionStats> {
    let (ws, _) = connect_async(url).await.context("Failed to connect")?;
    let (mut sink, mut stream) = ws.split();

    send_msg(&mut sink, &ClientMsg::Join).await?;
    debug!(url, "Join sent, waiting for snapshot");

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut view: Option<ArenaView> = None;
    let mut bullets = BulletPool::new();
    let mut input = InputController::new();
    let mut stats = SessionStats::default();

    let dt = 1.0 / TICK_HZ as f32;
    let mut tick = tokio::time::interval(Duration::from_secs_f64(1.0 / TICK_HZ as f64));
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let deadline = tokio::time::sleep(duration);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => break,

            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        stats.events_received += 1;
                        match serde_json::from_str::<ServerMsg>(&text) {
                            Ok(ServerMsg::InitGame(init)) => {
                                info!(self_id = %init.id, players = init.players.len(), "Joined arena");
                                view = Some(ArenaView::from_init(&init));
                            }
                            Ok(msg) => {
                                let Some(view) = view.as_mut() else { continue };

                                match &msg {
                                    ServerMsg::BulletFired(fired) => bullets.spawn(fired),
                                    ServerMsg::PlayerKilled(killed) => {
                                        if killed.id == view.self_id {
                                            stats.deaths += 1;
                                        } else if killed.killer_id == view.self_id {
                                            stats.kills += 1;
                                        }
                                    }
                                    _ => {}
                                }

                                // A kill against us forces a local respawn,
                                // which has to be reported like any move.
                                if let Some(report) = view.apply(&msg, &mut rng) {
                                    send_msg(&mut sink, &ClientMsg::Move(report)).await?;
                                    stats.moves_sent += 1;
                                }
                            }
                            Err(e) => {
                                warn!(error = %e, "Unparseable server message, dropping");
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!("Server closed the connection");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(error = %e, "WebSocket error");
                        break;
                    }
                }
            }

            _ = tick.tick() => {
                let Some(view) = view.as_mut() else { continue };

                input.tick(view, dt);

                let action = pilot.tick(dt);
                if action.look != (0.0, 0.0) {
                    input.look(view, action.look.0, action.look.1);
                }
                if action.jump {
                    input.start_jump(view);
                }
                input.step_movement(view, &action.keys);

                if action.keys.any() || action.jump {
                    send_msg(&mut sink, &ClientMsg::Move(view.move_report())).await?;
                    stats.moves_sent += 1;
                }

                if action.shoot {
                    let (dx, dy, dz) = input.aim_direction(view);
                    send_msg(&mut sink, &ClientMsg::Shoot(ShootMsg {
                        x: view.x,
                        y: view.y + SHOOT_HEIGHT,
                        z: view.z,
                        direction_x: dx,
                        direction_y: dy,
                        direction_z: dz,
                    })).await?;
                    stats.shots_sent += 1;
                }

                // Advisory hit detection on the locally simulated bullets.
                for target in bullets.tick(dt, view) {
                    send_msg(&mut sink, &ClientMsg::Hit(HitMsg { id: target })).await?;
                    stats.hits_sent += 1;
                }
            }
        }
    }

    let _ = sink.close().await;
    Ok(stats)
}

async fn send_msg(sink: &mut WsSink, msg: &ClientMsg) -> Result<()> {
    let json = serde_json::to_string(msg)?;
    sink.send(Message::Text(json))
        .await
        .context("Failed to send")?;
    Ok(())
}

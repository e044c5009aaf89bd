//! Bot swarm for the arena relay.
//!
//! Spawns multiple headless clients that:
//! - Connect to the relay and join the arena
//! - Wander, jump and shoot via the wander pilot
//! - Report advisory hits like a real client would
//!
//! Usage: cargo run --bin bots -- [OPTIONS]
//!
//! Options:
//!   --clients N      Number of bots to spawn (default: 8)
//!   --duration S     Run time in seconds (default: 30)
//!   --url URL        Relay URL (default: ws://127.0.0.1:3000/ws)
//!   --seed N         Base RNG seed (default: 42)

use std::time::{Duration, Instant};

use arena_game_server::client::{run_session, WanderPilot};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();

    let mut num_clients: u32 = 8;
    let mut duration_secs: u64 = 30;
    let mut url = "ws://127.0.0.1:3000/ws".to_string();
    let mut seed: u64 = 42;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--clients" => {
                i += 1;
                num_clients = args.get(i).and_then(|s| s.parse().ok()).unwrap_or(8);
            }
            "--duration" => {
                i += 1;
                duration_secs = args.get(i).and_then(|s| s.parse().ok()).unwrap_or(30);
            }
            "--url" => {
                i += 1;
                url = args.get(i).cloned().unwrap_or(url);
            }
            "--seed" => {
                i += 1;
                seed = args.get(i).and_then(|s| s.parse().ok()).unwrap_or(42);
            }
            _ => {}
        }
        i += 1;
    }

    println!("=== Arena Bot Swarm ===");
    println!("Bots: {}", num_clients);
    println!("Duration: {}s", duration_secs);
    println!("URL: {}", url);
    println!();

    let duration = Duration::from_secs(duration_secs);
    let start = Instant::now();

    let mut handles = Vec::with_capacity(num_clients as usize);
    for bot_id in 0..num_clients {
        let url = url.clone();
        let bot_seed = seed.wrapping_add(bot_id as u64);

        handles.push(tokio::spawn(async move {
            let mut pilot = WanderPilot::new(bot_seed);
            match run_session(&url, &mut pilot, duration, bot_seed).await {
                Ok(stats) => Some(stats),
                Err(e) => {
                    eprintln!("Bot {} failed: {}", bot_id, e);
                    None
                }
            }
        }));

        // Stagger spawns slightly to avoid thundering herd
        tokio::time::sleep(Duration::from_millis(25)).await;
    }

    let mut finished = 0u32;
    let mut events = 0u64;
    let mut moves = 0u64;
    let mut shots = 0u64;
    let mut hits = 0u64;
    let mut kills = 0u64;
    let mut deaths = 0u64;

    for handle in handles {
        if let Ok(Some(stats)) = handle.await {
            finished += 1;
            events += stats.events_received;
            moves += stats.moves_sent;
            shots += stats.shots_sent;
            hits += stats.hits_sent;
            kills += stats.kills;
            deaths += stats.deaths;
        }
    }

    println!();
    println!("=== Final Results ===");
    println!("Bots finished cleanly: {}/{}", finished, num_clients);
    println!("Events received: {}", events);
    println!("Moves sent: {}", moves);
    println!("Shots sent: {}", shots);
    println!("Hits reported: {}", hits);
    println!("Kills: {}", kills);
    println!("Deaths: {}", deaths);
    println!(
        "Events/sec (total): {:.0}",
        events as f64 / start.elapsed().as_secs_f64()
    );
}

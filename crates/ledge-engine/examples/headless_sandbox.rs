//! Headless sandbox: a scripted minute of platforming, no renderer.
//!
//! Builds a small level, drives the player with canned input, and prints
//! the world state every second of simulated time. Useful for eyeballing
//! the feel constants without a rendering host.
//!
//! Run with: `cargo run --example headless_sandbox`
//! (set `RUST_LOG=debug` for engine internals)

use ledge_engine::prelude::*;

const LEVEL: &str = r#"{
    "tilewidth": 16,
    "tileheight": 16,
    "width": 12,
    "height": 8,
    "layers": [
        { "name": "ground",
          "data": [0,0,0,0,0,0,0,0,0,0,0,1,
                   0,0,0,0,0,0,0,0,0,0,0,1,
                   0,0,0,0,0,0,0,0,0,0,0,1,
                   0,0,0,0,0,0,0,0,0,0,0,1,
                   0,0,0,0,1,1,0,0,0,0,0,1,
                   0,0,0,0,0,0,0,0,0,0,0,1,
                   0,0,0,0,0,0,0,0,0,0,0,1,
                   1,1,1,1,1,1,1,1,1,1,1,1] }
    ]
}"#;

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut engine = Engine::default();
    load_map_str(engine.world_mut(), LEVEL)?;
    let player = spawn_player(engine.world_mut(), Vec2::new(16.0, 16.0))?;
    spawn_enemy(engine.world_mut(), Vec2::new(96.0, 16.0))?;

    // Scripted input: run right, jump onto the ledge, fire a charge, dash.
    for frame in 0u64..3600 {
        let input = InputState {
            left: false,
            right: frame % 240 < 160,
            jump: frame % 90 == 0,
            dash: frame % 600 == 30,
            fire: frame % 300 == 120,
            cursor: Vec2::new(96.0, 112.0),
        };
        engine.step(&input);

        if frame % 60 == 59 {
            let body = engine.world().get::<Body>(player)?;
            let force = engine.world().get::<Force>(player)?;
            println!(
                "t={:>2}s  pos=({:>6.1},{:>6.1})  grounded={}  entities={}",
                (frame + 1) / 60,
                body.position.x,
                body.position.y,
                force.collisions.down,
                engine.world().entity_count(),
            );
        }
    }

    Ok(())
}

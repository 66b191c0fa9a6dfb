//! End-to-end platformer scenarios through the full engine pipeline.

use ledge_engine::prelude::*;

const TILE: f32 = 16.0;

/// A flat 6-tile floor at tile row 4 (y = 64).
const FLOOR_MAP: &str = r#"{
    "tilewidth": 16,
    "tileheight": 16,
    "width": 6,
    "height": 5,
    "layers": [
        { "name": "ground", "data": [0, 0, 0, 0, 0, 0,
                                     0, 0, 0, 0, 0, 0,
                                     0, 0, 0, 0, 0, 0,
                                     0, 0, 0, 0, 0, 0,
                                     1, 1, 1, 1, 1, 1] }
    ]
}"#;

fn floor_engine() -> (Engine, Entity) {
    let mut engine = Engine::default();
    load_map_str(engine.world_mut(), FLOOR_MAP).expect("load map");
    let player = spawn_player(engine.world_mut(), Vec2::new(TILE, TILE)).expect("spawn player");
    (engine, player)
}

fn player_body(engine: &Engine, player: Entity) -> Body {
    *engine.world().get::<Body>(player).unwrap()
}

fn player_force(engine: &Engine, player: Entity) -> Force {
    *engine.world().get::<Force>(player).unwrap()
}

#[test]
fn player_falls_and_rests_on_the_floor() {
    let (mut engine, player) = floor_engine();

    engine.run_steps(120, &InputState::default());

    let body = player_body(&engine, player);
    assert!(
        (body.position.y + body.size.y - 64.0).abs() < 1e-3,
        "bottom edge at {}",
        body.position.y + body.size.y
    );
    assert!(player_force(&engine, player).collisions.down);
}

#[test]
fn held_jump_keeps_the_player_bouncing() {
    let (mut engine, player) = floor_engine();

    // Settle on the floor first.
    engine.run_steps(120, &InputState::default());
    let resting_y = player_body(&engine, player).position.y;

    // Holding jump re-arms the buffer every frame, so the press that lands
    // within the buffer window fires on touchdown.
    let jumping = InputState {
        jump: true,
        ..InputState::default()
    };
    let mut airborne_frames = 0;
    for _ in 0..60 {
        engine.step(&jumping);
        if player_body(&engine, player).position.y < resting_y - 1.0 {
            airborne_frames += 1;
        }
    }
    assert!(airborne_frames > 10, "player never left the floor");
}

#[test]
fn walking_across_tile_seams_never_snags() {
    let (mut engine, player) = floor_engine();
    engine.run_steps(120, &InputState::default());

    let walk = InputState {
        right: true,
        ..InputState::default()
    };
    let mut last_x = player_body(&engine, player).position.x;
    for _ in 0..20 {
        engine.step(&walk);
        let force = player_force(&engine, player);
        assert!(
            !force.collisions.right,
            "snagged on a floor seam at x = {last_x}"
        );
        let x = player_body(&engine, player).position.x;
        assert!(x >= last_x, "player moved backwards");
        last_x = x;
    }
    // Crossed at least two tile seams.
    assert!(last_x > TILE * 3.0, "only reached x = {last_x}");
}

#[test]
fn dash_is_an_instant_velocity_impulse() {
    let (mut engine, player) = floor_engine();
    engine.run_steps(120, &InputState::default());
    let start_x = player_body(&engine, player).position.x;

    engine.step(&InputState {
        right: true,
        dash: true,
        ..InputState::default()
    });

    let moved = player_body(&engine, player).position.x - start_x;
    let dash_speed = engine.config().movement.dash_speed;
    assert!(
        moved >= dash_speed,
        "dash moved {moved}, expected at least {dash_speed}"
    );
}

#[test]
fn projectile_detonates_on_the_floor_and_is_reaped() {
    let (mut engine, player) = floor_engine();
    engine.run_steps(120, &InputState::default());

    // Fire a charge at a point on the floor ahead of the player.
    engine.step(&InputState {
        fire: true,
        cursor: Vec2::new(64.0, 64.0),
        ..InputState::default()
    });
    assert_eq!(engine.world().entities_with::<ProjectileTag>().len(), 1);

    // Let it fly, hit, detonate, and get flushed.
    engine.run_steps(240, &InputState::default());
    assert!(
        engine.world().entities_with::<ProjectileTag>().is_empty(),
        "projectile survived"
    );

    // The blast (or its own landing) never leaves the player stuck inside
    // the floor.
    let body = player_body(&engine, player);
    assert!(body.position.y + body.size.y <= 64.0 + 1e-3);
}

#[test]
fn knocked_back_enemy_comes_to_rest_again() {
    let (mut engine, _player) = floor_engine();
    let enemy = spawn_enemy(engine.world_mut(), Vec2::new(TILE * 3.0, TILE)).expect("spawn");
    engine.run_steps(120, &InputState::default());

    let enemy_start = engine.world().get::<Body>(enemy).unwrap().position;

    // Strike: the enemy is within range with a clear line of sight.
    engine.step(&InputState {
        fire: true,
        cursor: Vec2::new(enemy_start.x, enemy_start.y),
        ..InputState::default()
    });
    engine.run_steps(120, &InputState::default());

    let enemy_body = *engine.world().get::<Body>(enemy).unwrap();
    assert!(
        enemy_body.position.x > enemy_start.x + TILE,
        "enemy was not knocked away: {} vs {}",
        enemy_body.position.x,
        enemy_start.x
    );
}

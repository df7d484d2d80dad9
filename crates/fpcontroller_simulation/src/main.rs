//! Headless симуляция FPController
//!
//! Скриптованный прогон: персонаж бежит, выдыхается, приседает под балкой,
//! ждёт clearance и встаёт. Печатает состояние каждые 30 frame'ов.

use bevy::prelude::*;
use std::time::Duration;

use fpcontroller_simulation::{
    create_headless_app, spawn_character, CharacterConfig, CrouchController, HeadlessWorld, LocomotionIntegrator,
    PlayerAction, PlayerActionEvent, PlayerAxes, SprintController, StaticBox,
};

const FRAME: Duration = Duration::from_micros(16_667);
const TOTAL_FRAMES: u32 = 60 * 20;

fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|error| error.to_string())
            .and_then(|source| CharacterConfig::from_ron_str(&source).map_err(|error| error.to_string()))
        {
            Ok(config) => config,
            Err(error) => {
                eprintln!("Failed to load config {}: {}", path, error);
                std::process::exit(1);
            }
        },
        None => CharacterConfig::default(),
    };

    println!("Starting FPController headless simulation ({} frames)", TOTAL_FRAMES);

    let mut app = create_headless_app(FRAME);

    // низкая балка над дорожкой: стоя не пройти, сидя: можно
    app.world_mut()
        .resource_mut::<HeadlessWorld>()
        .add_box(StaticBox::new(Vec3::new(-2.0, 1.7, -40.0), Vec3::new(2.0, 2.5, -36.0)));

    let spawned = {
        let mut commands = app.world_mut().commands();
        spawn_character(&mut commands, Vec3::new(0.0, 1.0, 0.0), &config)
    };
    app.world_mut().flush();

    let player = match spawned {
        Ok(entity) => entity,
        Err(error) => {
            eprintln!("Invalid character config: {}", error);
            std::process::exit(1);
        }
    };

    let script = [
        (10, PlayerAction::SprintEngaged),
        (60 * 9, PlayerAction::CrouchEngaged),
        (60 * 12, PlayerAction::CrouchReleased),
    ];

    for frame in 0..TOTAL_FRAMES {
        for (_, action) in script.iter().filter(|(at, _)| *at == frame) {
            app.world_mut().send_event(PlayerActionEvent {
                entity: player,
                action: *action,
            });
        }

        if let Some(mut axes) = app.world_mut().get_mut::<PlayerAxes>(player) {
            axes.move_axis = Vec2::Y;
        }

        app.update();

        if frame % 30 == 0 {
            let world = app.world();
            let (Some(transform), Some(integrator)) = (
                world.get::<Transform>(player),
                world.get::<LocomotionIntegrator>(player),
            ) else {
                continue;
            };

            let crouch = world.get::<CrouchController>(player).map(|c| c.phase().name()).unwrap_or("-");
            let stamina = world
                .get::<SprintController>(player)
                .map(|s| format!("{:.1} ({})", s.current(), s.phase().name()))
                .unwrap_or_else(|| "-".to_string());

            println!(
                "Frame {}: pos ({:.2}, {:.2}, {:.2}) grounded {} | crouch {} | stamina {}",
                frame,
                transform.translation.x,
                transform.translation.y,
                transform.translation.z,
                integrator.motion.grounded,
                crouch,
                stamina
            );
        }
    }

    println!("Simulation complete!");
}

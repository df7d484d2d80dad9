//! Movement systems
//!
//! Input (LocomotionSet::Input): look, оси, действия → intent / jump / walk.
//! Move (LocomotionSet::Move): `move_character` вызывается backend'ом с его `SpatialQuery`.

use bevy::ecs::query::QueryItem;
use bevy::prelude::*;

use super::{JumpIntent, LocomotionIntegrator, LookController, PlayerAction, PlayerActionEvent, PlayerAxes, SpeedModifiers};
use crate::crouch::CrouchController;
use crate::physics::{CharacterCapsule, GroundSensor, SpatialQuery};
use crate::sprint::SprintController;

/// Данные персонажа, нужные для capsule move
pub type MoveQueryData = (
    Entity,
    &'static mut LocomotionIntegrator,
    &'static GroundSensor,
    Option<&'static CrouchController>,
    Option<&'static SprintController>,
    &'static CharacterCapsule,
    &'static mut Transform,
);

/// Система: look delta → yaw/pitch, оси → horizontal intent
pub fn apply_player_axes(
    mut query: Query<(&PlayerAxes, &mut LookController, &mut Transform, &mut LocomotionIntegrator)>,
) {
    for (axes, mut look, mut transform, mut integrator) in query.iter_mut() {
        if axes.look_delta != Vec2::ZERO {
            look.apply_delta(axes.look_delta);
            transform.rotation = look.body_rotation();
        }

        let (forward, right) = look.basis();
        integrator.set_move_axis(axes.move_axis, forward, right);
    }
}

/// Система: discrete actions → JumpIntent / walk toggle
pub fn dispatch_player_actions(
    mut actions: EventReader<PlayerActionEvent>,
    mut jumps: EventWriter<JumpIntent>,
    mut integrators: Query<&mut LocomotionIntegrator>,
) {
    for event in actions.read() {
        match event.action {
            PlayerAction::Jump => {
                jumps.write(JumpIntent { entity: event.entity });
            }
            PlayerAction::WalkHeld | PlayerAction::WalkReleased => {
                if let Ok(mut integrator) = integrators.get_mut(event.entity) {
                    integrator.set_walking(event.action == PlayerAction::WalkHeld);
                }
            }
            // crouch / sprint / interact читают свои системы
            _ => {}
        }
    }
}

/// Система: JumpIntent → edge-triggered запрос прыжка
pub fn apply_jump_intents(mut intents: EventReader<JumpIntent>, mut integrators: Query<&mut LocomotionIntegrator>) {
    for intent in intents.read() {
        if let Ok(mut integrator) = integrators.get_mut(intent.entity) {
            integrator.request_jump();
        }
    }
}

/// Один tick интегратора для одного персонажа
///
/// Вызывается backend системой (headless / rapier) в `LocomotionSet::Move`.
pub fn move_character(queries: &impl SpatialQuery, item: QueryItem<'_, MoveQueryData>, delta: f32) {
    let (_, mut integrator, sensor, crouch, sprint, capsule, mut transform) = item;

    let modifiers = SpeedModifiers {
        crouch_divider: crouch.map(CrouchController::divider),
        walking: integrator.walking(),
        walk_divider: integrator.config.walk_divider,
        sprint_multiplier: sprint.map(SprintController::multiplier),
    };

    let applied = integrator.tick(
        delta,
        sensor.grounded,
        modifiers,
        capsule,
        transform.translation,
        queries,
    );
    transform.translation += applied;
}

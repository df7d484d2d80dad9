//! Crouch systems

use bevy::prelude::*;

use super::CrouchController;
use crate::movement::{PlayerAction, PlayerActionEvent};
use crate::physics::{CharacterCapsule, GroundSensor};

/// Система: crouch actions + таймеры decrouch/ожидания (LocomotionSet::Modifiers)
///
/// Ceiling probe уже отработал в этом frame (LocomotionSet::Sense).
/// Change detection на CharacterCapsule срабатывает только при реальном изменении формы.
pub fn update_crouch(
    mut actions: EventReader<PlayerActionEvent>,
    mut characters: Query<(Entity, &mut CrouchController, &mut CharacterCapsule, &GroundSensor)>,
    time: Res<Time>,
) {
    let actions: Vec<PlayerActionEvent> = actions.read().cloned().collect();
    let delta = time.delta_secs();

    for (entity, mut crouch, mut capsule, sensor) in characters.iter_mut() {
        let previous = crouch.phase();
        crouch.set_ceiling_blocked(sensor.ceiling_blocked);

        let mut reshaped = false;
        for event in actions.iter().filter(|event| event.entity == entity) {
            match event.action {
                PlayerAction::CrouchEngaged => reshaped |= crouch.engage(capsule.bypass_change_detection()),
                PlayerAction::CrouchReleased => reshaped |= crouch.release(capsule.bypass_change_detection()),
                _ => {}
            }
        }

        // delta этого frame прошла до действия: новая фаза отсчитывается со следующего frame
        let elapsed = if crouch.phase() != previous { 0.0 } else { delta };
        reshaped |= crouch.tick(elapsed, capsule.bypass_change_detection());

        if reshaped {
            capsule.set_changed();
        }

        let current = crouch.phase();
        if std::mem::discriminant(&previous) != std::mem::discriminant(&current) {
            crate::log(&format!(
                "{:?} crouch: {} → {} (height {:.3}, divider {})",
                entity,
                previous.name(),
                current.name(),
                capsule.height,
                crouch.divider()
            ));
        }
    }
}

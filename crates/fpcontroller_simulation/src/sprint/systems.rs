//! Sprint / stamina systems

use bevy::prelude::*;

use super::{SprintController, StaminaEmpty, StaminaFractionChanged, StaminaRecovered};
use crate::movement::{PlayerAction, PlayerActionEvent};

/// Система: sprint actions + drain/cooldown/recovery (LocomotionSet::Modifiers)
///
/// События несут entity персонажа; UI и анимация подписываются через EventReader.
pub fn update_sprint(
    mut actions: EventReader<PlayerActionEvent>,
    mut characters: Query<(Entity, &mut SprintController)>,
    mut emptied: EventWriter<StaminaEmpty>,
    mut recovered: EventWriter<StaminaRecovered>,
    mut fraction_changed: EventWriter<StaminaFractionChanged>,
    time: Res<Time>,
) {
    let actions: Vec<PlayerActionEvent> = actions.read().cloned().collect();
    let delta = time.delta_secs();

    for (entity, mut sprint) in characters.iter_mut() {
        let previous = sprint.phase();
        for event in actions.iter().filter(|event| event.entity == entity) {
            match event.action {
                PlayerAction::SprintEngaged => {
                    if !sprint.engage() && !sprint.able_to_sprint() {
                        crate::log(&format!("{:?} sprint: ignored, stamina exhausted", entity));
                    }
                }
                PlayerAction::SprintReleased => {
                    sprint.release();
                }
                _ => {}
            }
        }

        // как и в crouch: delta этого frame не засчитывается новой фазе
        let elapsed = if sprint.phase() != previous { 0.0 } else { delta };
        let outcome = sprint.tick(elapsed);

        if outcome.emptied {
            crate::log_info(&format!("{:?} sprint: stamina empty", entity));
            emptied.write(StaminaEmpty { entity });
        }

        if outcome.recovered {
            crate::log_info(&format!(
                "{:?} sprint: stamina recovered ({:.0}%)",
                entity,
                sprint.fraction() * 100.0
            ));
            recovered.write(StaminaRecovered { entity });
        }

        if outcome.fraction_changed {
            fraction_changed.write(StaminaFractionChanged {
                entity,
                fraction: sprint.fraction(),
            });
        }
    }
}

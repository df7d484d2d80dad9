//! Spawn, setup validation и respawn персонажа

use bevy::prelude::*;

use crate::config::{CharacterConfig, ConfigError};
use crate::crouch::CrouchController;
use crate::interaction::InteractionFocus;
use crate::movement::{LocomotionIntegrator, LookController, Player, PlayerAxes};
use crate::physics::{CharacterCapsule, GroundSensor};
use crate::sprint::SprintController;

/// Event: respawn персонажа в `position` (всё состояние модификаторов сбрасывается)
#[derive(Event, Debug, Clone)]
pub struct CharacterReset {
    pub entity: Entity,
    pub position: Vec3,
}

/// Spawn helper для создания персонажа
///
/// Создает entity с полным набором компонентов:
/// - Transform (центр capsule стоя)
/// - CharacterCapsule + GroundSensor
/// - LocomotionIntegrator + LookController + PlayerAxes + InteractionFocus
/// - CrouchController / SprintController, если они есть в конфиге
///
/// Конфиг валидируется здесь, дальше dividers гарантированно > 0.
pub fn spawn_character(
    commands: &mut Commands,
    position: Vec3,
    config: &CharacterConfig,
) -> Result<Entity, ConfigError> {
    config.validate().inspect_err(|error| {
        crate::log_error(&format!("spawn_character: invalid config: {}", error));
    })?;

    let mut entity = commands.spawn((
        Transform::from_translation(position),
        Player,
        CharacterCapsule::from_config(&config.capsule),
        GroundSensor::default(),
        LocomotionIntegrator::new(config.movement),
        LookController::new(config.look),
        PlayerAxes::default(),
        InteractionFocus::from_config(&config.interaction),
    ));

    if let Some(crouch) = config.crouch {
        entity.insert(CrouchController::new(crouch));
    }
    if let Some(sprint) = config.sprint {
        entity.insert(SprintController::new(sprint));
    }

    let id = entity.id();
    crate::log(&format!(
        "Spawned character {:?} at {:?} (crouch: {}, sprint: {})",
        id,
        position,
        config.crouch.is_some(),
        config.sprint.is_some()
    ));

    Ok(id)
}

/// Система: персонаж без capsule не может двигаться: ошибка настройки
///
/// Fallible system: ошибка уходит в error handler приложения.
pub fn validate_character_setup(
    characters: Query<Entity, (Added<LocomotionIntegrator>, Without<CharacterCapsule>)>,
) -> Result<(), BevyError> {
    if let Some(entity) = characters.iter().next() {
        let error = ConfigError::MissingCapsule { entity };
        crate::log_error(&error.to_string());
        return Err(error.into());
    }

    Ok(())
}

/// Система: CharacterReset → исходное состояние движения, crouch, stamina, look
pub fn reset_characters(
    mut resets: EventReader<CharacterReset>,
    mut characters: Query<(
        &mut Transform,
        &mut CharacterCapsule,
        &mut LocomotionIntegrator,
        &mut LookController,
        &mut GroundSensor,
        Option<&mut CrouchController>,
        Option<&mut SprintController>,
    )>,
) {
    for reset in resets.read() {
        let Ok((mut transform, mut capsule, mut integrator, mut look, mut sensor, crouch, sprint)) =
            characters.get_mut(reset.entity)
        else {
            crate::log_warning(&format!("CharacterReset: {:?} is not a character", reset.entity));
            continue;
        };

        *transform = Transform::from_translation(reset.position);
        integrator.reset();
        look.reset();
        *sensor = GroundSensor::default();
        match crouch {
            Some(mut crouch) => crouch.reset(&mut capsule),
            None => capsule.reset(),
        }
        if let Some(mut sprint) = sprint {
            sprint.reset();
        }

        crate::log(&format!("Reset character {:?} at {:?}", reset.entity, reset.position));
    }
}

//! Interaction systems
//!
//! Focus (LocomotionSet::Focus): backend вызывает `cast_view_ray` + `refresh_focus`.
//! Interaction (LocomotionSet::Interaction): Interact action по текущему фокусу, разблокировка ключом.

use bevy::prelude::*;

use super::{
    Interactable, InteractableKind, InteractableRegistry, InteractionFocus, InteractionPromptChanged, ItemPicked,
    PlayAnimationState,
};
use crate::movement::{LookController, PlayerAction, PlayerActionEvent};
use crate::physics::{CharacterCapsule, SpatialQuery};

/// Луч от глаз по направлению взгляда; возвращает entity коллайдера
pub fn cast_view_ray(
    queries: &impl SpatialQuery,
    look: &LookController,
    capsule: &CharacterCapsule,
    translation: Vec3,
    focus: &InteractionFocus,
) -> Option<Entity> {
    queries.ray_cast(
        capsule.eye_position(translation),
        look.view_direction(),
        focus.range,
        focus.mask,
    )
}

/// Попадание луча → фокус и prompt; событие только при изменении prompt
pub fn refresh_focus(
    viewer: Entity,
    hit: Option<Entity>,
    registry: &InteractableRegistry,
    interactables: &Query<&Interactable>,
    focus: &mut InteractionFocus,
    prompts: &mut EventWriter<InteractionPromptChanged>,
) {
    let target = hit
        .map(|collider| registry.resolve(collider).unwrap_or(collider))
        .and_then(|owner| {
            interactables
                .get(owner)
                .ok()
                .filter(|interactable| interactable.interactive)
                .map(|interactable| (owner, interactable.current_text().to_string()))
        });

    let (target, prompt) = match target {
        Some((owner, text)) => (Some(owner), Some(text)),
        None => (None, None),
    };

    focus.target = target;
    if focus.prompt != prompt {
        focus.prompt = prompt.clone();
        prompts.write(InteractionPromptChanged { viewer, text: prompt });
    }
}

/// Система: Interact action → действие объекта в фокусе
pub fn handle_interactions(
    mut commands: Commands,
    mut actions: EventReader<PlayerActionEvent>,
    mut viewers: Query<&mut InteractionFocus>,
    mut interactables: Query<&mut Interactable>,
    mut registry: ResMut<InteractableRegistry>,
    mut animations: EventWriter<PlayAnimationState>,
    mut picked: EventWriter<ItemPicked>,
) {
    for event in actions.read() {
        if event.action != PlayerAction::Interact {
            continue;
        }

        let Ok(mut focus) = viewers.get_mut(event.entity) else {
            continue;
        };
        let Some(target) = focus.target else {
            continue;
        };
        let Ok(mut interactable) = interactables.get_mut(target) else {
            continue;
        };
        if !interactable.interactive {
            continue;
        }

        match interactable.kind.clone() {
            InteractableKind::Standard { animation_state }
            | InteractableKind::LockedByKey { animation_state, .. } => {
                let direction = if interactable.interacted { -1.0 } else { 1.0 };
                animations.write(PlayAnimationState {
                    target,
                    state: animation_state,
                    direction,
                });
                interactable.interacted = !interactable.interacted;
            }
            InteractableKind::KeyItem { key } => {
                crate::log_info(&format!("{:?} picked key item {:?} ({})", event.entity, target, key));
                picked.write(ItemPicked { item: target, key });
                registry.unregister(target);
                commands.entity(target).despawn();
                focus.target = None;
            }
        }
    }
}

/// Система: подобранный ключ открывает соответствующие LockedByKey
pub fn unlock_by_key(mut picked: EventReader<ItemPicked>, mut interactables: Query<(Entity, &mut Interactable)>) {
    for event in picked.read() {
        for (entity, mut interactable) in interactables.iter_mut() {
            let unlocks = matches!(
                &interactable.kind,
                InteractableKind::LockedByKey { required_key, .. } if *required_key == event.key
            );

            if unlocks && !interactable.interactive {
                interactable.interactive = true;
                crate::log(&format!("{:?} unlocked by key '{}'", entity, event.key));
            }
        }
    }
}

//! Movement events

use bevy::prelude::*;

/// Дискретное действие игрока (press / release)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum PlayerAction {
    Jump,
    CrouchEngaged,
    CrouchReleased,
    SprintEngaged,
    SprintReleased,
    WalkHeld,
    WalkReleased,
    Interact,
}

/// Event: действие игрока для конкретного персонажа
///
/// Генерируется input binding слоем (или тестом), читается модификаторами
/// и interaction в `LocomotionSet::Modifiers` / `LocomotionSet::Interaction`.
#[derive(Event, Debug, Clone)]
pub struct PlayerActionEvent {
    pub entity: Entity,
    pub action: PlayerAction,
}

/// Event: намерение прыгнуть (jump intent)
///
/// Генерируется:
/// - `dispatch_player_actions` из `PlayerAction::Jump`
/// - любой другой системой (скрипт, AI)
///
/// Обрабатывается `apply_jump_intents`: edge-triggered запрос в LocomotionIntegrator,
/// прыжок выполняется только если персонаж на земле.
#[derive(Event, Debug, Clone)]
pub struct JumpIntent {
    pub entity: Entity,
}

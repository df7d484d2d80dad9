//! Interaction events (для анимации и UI)

use bevy::prelude::*;

/// Event: проиграть состояние анимации объекта
///
/// `direction` = 1.0 при первом взаимодействии, -1.0 при обратном (закрыть дверь).
#[derive(Event, Debug, Clone, PartialEq)]
pub struct PlayAnimationState {
    pub target: Entity,
    pub state: String,
    pub direction: f32,
}

/// Event: prompt взаимодействия изменился (`None`: скрыть)
///
/// Пишется только при изменении, не каждый frame.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct InteractionPromptChanged {
    pub viewer: Entity,
    pub text: Option<String>,
}

/// Event: подобран ключевой предмет
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ItemPicked {
    pub item: Entity,
    pub key: String,
}

//! Interactable объекты и фокус персонажа

use bevy::prelude::*;
use std::collections::HashMap;

use crate::config::InteractionConfig;

/// Что делает объект при взаимодействии
#[derive(Debug, Clone, PartialEq, Eq, Reflect)]
pub enum InteractableKind {
    /// Дверь, ящик: проигрывает анимацию вперёд/назад
    Standard { animation_state: String },
    /// Подбирается и исчезает, открывает `LockedByKey` с тем же ключом
    KeyItem { key: String },
    /// Как `Standard`, но неактивен, пока не подобран `required_key`
    LockedByKey {
        animation_state: String,
        required_key: String,
    },
}

#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Interactable {
    pub kind: InteractableKind,
    /// Prompt до взаимодействия
    pub text: String,
    /// Prompt после взаимодействия
    pub reverse_text: String,
    pub interacted: bool,
    pub interactive: bool,
}

impl Interactable {
    fn with_kind(kind: InteractableKind, interactive: bool) -> Self {
        Self {
            kind,
            text: "open".to_string(),
            reverse_text: "close".to_string(),
            interacted: false,
            interactive,
        }
    }

    pub fn standard(animation_state: impl Into<String>) -> Self {
        Self::with_kind(
            InteractableKind::Standard {
                animation_state: animation_state.into(),
            },
            true,
        )
    }

    pub fn key_item(key: impl Into<String>) -> Self {
        let mut item = Self::with_kind(InteractableKind::KeyItem { key: key.into() }, true);
        item.text = "pick up".to_string();
        item
    }

    /// Заперт до подбора ключа
    pub fn locked_by_key(animation_state: impl Into<String>, required_key: impl Into<String>) -> Self {
        Self::with_kind(
            InteractableKind::LockedByKey {
                animation_state: animation_state.into(),
                required_key: required_key.into(),
            },
            false,
        )
    }

    pub fn with_text(mut self, text: impl Into<String>, reverse_text: impl Into<String>) -> Self {
        self.text = text.into();
        self.reverse_text = reverse_text.into();
        self
    }

    pub fn current_text(&self) -> &str {
        if self.interacted {
            &self.reverse_text
        } else {
            &self.text
        }
    }
}

/// Collider entity → interactable entity
///
/// Коллайдер может быть дочерним entity объекта; lookup делается один раз при попадании луча.
#[derive(Resource, Debug, Default)]
pub struct InteractableRegistry {
    owners: HashMap<Entity, Entity>,
}

impl InteractableRegistry {
    pub fn register(&mut self, collider: Entity, owner: Entity) {
        self.owners.insert(collider, owner);
    }

    /// Убирает все коллайдеры объекта
    pub fn unregister(&mut self, owner: Entity) {
        self.owners.retain(|_, registered| *registered != owner);
    }

    pub fn resolve(&self, collider: Entity) -> Option<Entity> {
        self.owners.get(&collider).copied()
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

/// На что сейчас смотрит персонаж
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct InteractionFocus {
    pub target: Option<Entity>,
    /// Показанный prompt (для событий только при изменении)
    pub prompt: Option<String>,
    /// Дальность луча (m)
    pub range: f32,
    pub mask: u32,
}

impl InteractionFocus {
    pub fn from_config(config: &InteractionConfig) -> Self {
        Self {
            target: None,
            prompt: None,
            range: config.range,
            mask: config.mask,
        }
    }
}

//! Interaction domain: объекты, с которыми персонаж взаимодействует взглядом
//!
//! Содержит:
//! - Interactable + InteractableKind (standard / key item / locked by key)
//! - InteractableRegistry (collider → объект)
//! - InteractionFocus (что сейчас под прицелом)
//! - events: PlayAnimationState, InteractionPromptChanged, ItemPicked

pub mod components;
pub mod events;
pub mod systems;

// Re-export all components and events
pub use components::*;
pub use events::*;
pub use systems::{cast_view_ray, handle_interactions, refresh_focus, unlock_by_key};

//! FPController Simulation Core
//!
//! First-person locomotion на Bevy 0.16 ECS:
//! - LocomotionIntegrator (gravity, jump, ground anchor, composition скорости)
//! - CrouchController (capsule height + timed decrouch)
//! - SprintController (stamina budget, drain/cooldown/recovery)
//! - Interaction (объекты под взглядом)
//!
//! Физика за trait `SpatialQuery`: headless AABB мир или Rapier query pipeline.
//!
//! Порядок внутри frame (Update):
//! Input → Sense (ceiling probe) → Modifiers (crouch, sprint) → Move → Focus → Interaction.
//! Ground probe: FixedUpdate 60Hz, интегратор читает кэш.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;

pub mod character;
pub mod config;
pub mod crouch;
pub mod interaction;
pub mod logger;
pub mod movement;
pub mod physics;
pub mod sprint;

// Re-export базовых типов для удобства
pub use character::{reset_characters, spawn_character, validate_character_setup, CharacterReset};
pub use config::{
    CapsuleConfig, CharacterConfig, ConfigError, CrouchConfig, InteractionConfig, LookConfig, MovementConfig,
    SprintConfig,
};
pub use crouch::{CrouchController, CrouchPhase};
pub use interaction::{
    Interactable, InteractableKind, InteractableRegistry, InteractionFocus, InteractionPromptChanged, ItemPicked,
    PlayAnimationState,
};
pub use movement::{
    JumpIntent, LocomotionIntegrator, LookController, MotionState, Player, PlayerAction, PlayerActionEvent,
    PlayerAxes, SpeedModifiers,
};
pub use physics::{
    CharacterCapsule, GroundSensor, HeadlessPhysicsPlugin, HeadlessWorld, RapierBackendPlugin, SpatialQuery,
    StaticBox,
};
pub use sprint::{SprintController, SprintPhase, StaminaEmpty, StaminaFractionChanged, StaminaRecovered};

pub use logger::{
    init_logger, log, log_error, log_info, log_level, log_warning, log_with_level, set_log_level, set_logger,
    LogLevel, LogPrinter,
};

/// Фазы locomotion внутри Update (выполняются последовательно)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocomotionSet {
    /// Оси, look, discrete actions
    Input,
    /// Ceiling probe (physics backend)
    Sense,
    /// Crouch / sprint state machines
    Modifiers,
    /// Два capsule move (physics backend)
    Move,
    /// Interaction луч (physics backend)
    Focus,
    /// Interact action, разблокировка ключами
    Interaction,
}

/// Locomotion + interaction без physics backend'а
///
/// Physics backend добавляется отдельно: `HeadlessPhysicsPlugin` или `RapierBackendPlugin`.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для ground probe
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .init_resource::<InteractableRegistry>()
            // Input
            .add_event::<PlayerActionEvent>()
            .add_event::<JumpIntent>()
            .add_event::<CharacterReset>()
            // Notifications / presentation
            .add_event::<StaminaEmpty>()
            .add_event::<StaminaRecovered>()
            .add_event::<StaminaFractionChanged>()
            .add_event::<PlayAnimationState>()
            .add_event::<InteractionPromptChanged>()
            .add_event::<ItemPicked>()
            .configure_sets(
                Update,
                (
                    LocomotionSet::Input,
                    LocomotionSet::Sense,
                    LocomotionSet::Modifiers,
                    LocomotionSet::Move,
                    LocomotionSet::Focus,
                    LocomotionSet::Interaction,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (validate_character_setup, reset_characters)
                    .chain()
                    .before(LocomotionSet::Input),
            )
            .add_systems(
                Update,
                (
                    movement::apply_player_axes,
                    movement::dispatch_player_actions,
                    movement::apply_jump_intents,
                )
                    .chain() // Последовательное выполнение: JumpIntent в том же frame
                    .in_set(LocomotionSet::Input),
            )
            .add_systems(
                Update,
                (crouch::update_crouch, sprint::update_sprint).in_set(LocomotionSet::Modifiers),
            )
            .add_systems(
                Update,
                (interaction::handle_interactions, interaction::unlock_by_key)
                    .chain()
                    .in_set(LocomotionSet::Interaction),
            );
    }
}

/// Headless App: MinimalPlugins, ручной шаг времени, AABB мир с полом
///
/// Каждый `app.update()` продвигает время ровно на `frame_time` (первый update: нулевой).
/// Мир: пол на y = 0, остальную геометрию добавлять через `HeadlessWorld`.
pub fn create_headless_app(frame_time: Duration) -> App {
    init_logger();

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(frame_time))
        .add_plugins((SimulationPlugin, HeadlessPhysicsPlugin))
        .insert_resource(HeadlessWorld::with_floor(0.0));

    app
}

/// Байтовый snapshot всех компонентов `T` (Debug формат, упорядочено по Entity)
///
/// Два прогона с одинаковым скриптом дают одинаковые snapshot'ы.
pub fn world_snapshot<T: Component + std::fmt::Debug>(world: &mut World) -> Vec<u8> {
    let mut rows: Vec<(Entity, String)> = world
        .query::<(Entity, &T)>()
        .iter(world)
        .map(|(entity, component)| (entity, format!("{:?}", component)))
        .collect();
    rows.sort_unstable_by_key(|(entity, _)| *entity);

    let mut snapshot = std::any::type_name::<T>().as_bytes().to_vec();
    for (entity, row) in rows {
        snapshot.extend_from_slice(&entity.to_bits().to_le_bytes());
        snapshot.extend_from_slice(row.as_bytes());
    }
    snapshot
}

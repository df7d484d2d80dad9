//! Movement domain: locomotion integrator, look, input
//!
//! Содержит:
//! - LocomotionIntegrator + MotionState (gravity, jump, composition модификаторов)
//! - LookController (yaw тела, pitch камеры)
//! - PlayerAxes / PlayerActionEvent / JumpIntent (input)
//! - systems: input dispatch и `move_character` для physics backend'ов

pub mod components;
pub mod events;
pub mod integrator;
pub mod look;
pub mod systems;

#[cfg(test)]
mod integrator_tests;

// Re-export all components and events
pub use components::*;
pub use events::*;
pub use integrator::{compose_speed, jump_impulse, LocomotionIntegrator, MotionState, SpeedModifiers, GROUND_ANCHOR_VELOCITY};
pub use look::LookController;
pub use systems::{apply_jump_intents, apply_player_axes, dispatch_player_actions, move_character, MoveQueryData};

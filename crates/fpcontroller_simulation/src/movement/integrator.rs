//! Locomotion integrator
//!
//! Порядок одного tick:
//! 1. grounded из кэша GroundSensor (обновляется на fixed step)
//! 2. grounded и v < ε → v = ground anchor (-2 m/s), держит capsule прижатой к земле
//! 3. speed: ÷ crouch divider, затем walk ? ÷ walk divider : × sprint multiplier
//! 4. горизонтальный capsule move
//! 5. v += g·dt, отдельный вертикальный capsule move
//! 6. jump (edge-triggered, только на земле): v = sqrt(2·h·|g|)
//!
//! Позиция меняется ТОЛЬКО на фактически применённое смещение из physics.

use bevy::prelude::*;

use crate::config::MovementConfig;
use crate::physics::{ground_cast, probe, CharacterCapsule, SpatialQuery};

/// Вертикальная скорость, к которой прижимается стоящий на земле персонаж (m/s)
pub const GROUND_ANCHOR_VELOCITY: f32 = -2.0;

/// Начальная скорость прыжка на высоту `jump_height` при гравитации `gravity`
pub fn jump_impulse(jump_height: f32, gravity: f32) -> f32 {
    (2.0 * jump_height * gravity.abs()).sqrt()
}

/// Модификаторы скорости на текущий tick
///
/// `None`: соответствующего контроллера у персонажа нет, шаг пропускается.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedModifiers {
    pub crouch_divider: Option<f32>,
    pub walking: bool,
    pub walk_divider: f32,
    pub sprint_multiplier: Option<f32>,
}

impl SpeedModifiers {
    /// Без модификаторов (базовая скорость)
    pub fn neutral(walk_divider: f32) -> Self {
        Self {
            crouch_divider: None,
            walking: false,
            walk_divider,
            sprint_multiplier: None,
        }
    }
}

/// Итоговая горизонтальная скорость (m/s)
///
/// Crouch divider применяется всегда; walk и sprint взаимоисключающие, walk важнее.
pub fn compose_speed(base_speed: f32, modifiers: SpeedModifiers) -> f32 {
    let mut speed = base_speed;

    if let Some(divider) = modifiers.crouch_divider {
        speed /= divider;
    }

    if modifiers.walking {
        speed /= modifiers.walk_divider;
    } else if let Some(multiplier) = modifiers.sprint_multiplier {
        speed *= multiplier;
    }

    speed
}

/// Состояние движения, переживающее tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub struct MotionState {
    /// Единичный (или нулевой) вектор в плоскости XZ
    pub horizontal_intent: Vec3,
    pub vertical_velocity: f32,
    pub grounded: bool,
    pub jump_requested: bool,
}

/// Корневой компонент locomotion
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct LocomotionIntegrator {
    pub config: MovementConfig,
    pub motion: MotionState,
    walking: bool,
}

impl LocomotionIntegrator {
    pub fn new(config: MovementConfig) -> Self {
        Self {
            config,
            motion: MotionState::default(),
            walking: false,
        }
    }

    pub fn walking(&self) -> bool {
        self.walking
    }

    pub fn set_walking(&mut self, walking: bool) {
        self.walking = walking;
    }

    /// Оси input → направление в мире через горизонтальный базис персонажа
    pub fn set_move_axis(&mut self, axis: Vec2, forward: Vec3, right: Vec3) {
        let axis = axis.clamp(Vec2::NEG_ONE, Vec2::ONE);
        let direction = forward * axis.y + right * axis.x;
        self.motion.horizontal_intent = Vec3::new(direction.x, 0.0, direction.z).normalize_or_zero();
    }

    /// Edge-triggered: запрос живёт до ближайшего tick
    pub fn request_jump(&mut self) {
        self.motion.jump_requested = true;
    }

    pub fn probe_ground(&self, queries: &impl SpatialQuery, capsule: &CharacterCapsule, translation: Vec3) -> bool {
        let cast = ground_cast(capsule, translation, self.config.ground_offset, self.config.ground_mask);
        probe(queries, &cast)
    }

    /// Один tick интегратора. Возвращает суммарное применённое смещение.
    pub fn tick(
        &mut self,
        delta: f32,
        grounded: bool,
        modifiers: SpeedModifiers,
        capsule: &CharacterCapsule,
        translation: Vec3,
        queries: &impl SpatialQuery,
    ) -> Vec3 {
        let motion = &mut self.motion;
        motion.grounded = grounded;

        if motion.grounded && motion.vertical_velocity < f32::EPSILON {
            motion.vertical_velocity = GROUND_ANCHOR_VELOCITY;
        }

        // Горизонталь
        let speed = compose_speed(self.config.speed, modifiers);
        let horizontal = motion.horizontal_intent * speed * delta;
        let applied_horizontal =
            queries.move_capsule(&capsule.sweep_at(translation, self.config.collision_mask), horizontal);

        // Вертикаль: отдельный move от новой позиции
        motion.vertical_velocity += self.config.gravity * delta;
        let vertical = Vec3::new(0.0, motion.vertical_velocity * delta, 0.0);
        let applied_vertical = queries.move_capsule(
            &capsule.sweep_at(translation + applied_horizontal, self.config.collision_mask),
            vertical,
        );

        if std::mem::take(&mut motion.jump_requested) && motion.grounded {
            motion.vertical_velocity = jump_impulse(self.config.jump_height, self.config.gravity);
        }

        applied_horizontal + applied_vertical
    }

    /// Respawn: покой, без walk
    pub fn reset(&mut self) {
        self.motion = MotionState::default();
        self.walking = false;
    }
}

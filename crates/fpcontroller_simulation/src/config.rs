//! Конфигурация персонажа (tuning constants)
//!
//! Все параметры: plain numbers с единицами в doc-комментариях (метры, секунды, доли).
//! Валидация выполняется один раз при spawn, не каждый tick: после `validate()`
//! ни один divider не может быть нулевым или отрицательным.
//!
//! Формат файла: RON:
//! ```ron
//! (
//!     movement: (speed: 6.0, walk_divider: 2.0),
//!     crouch: Some((crouch_amount: 0.6)),
//!     sprint: None,
//! )
//! ```

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::physics::ALL_LAYERS;

/// Ошибки конфигурации: единственные ошибки, которые вообще может вернуть crate.
///
/// Runtime условия (probe miss, blocked ceiling, пустая stamina): это state, не ошибки.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("`{field}` must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("`movement.gravity` must point down (negative), got {value}")]
    GravityNotDownward { value: f32 },

    #[error("`{field}` must be a fraction in [0, 1], got {value}")]
    FractionOutOfRange { field: &'static str, value: f32 },

    #[error("capsule height {height} is shorter than its diameter (radius {radius})")]
    CapsuleTooShort { height: f32, radius: f32 },

    #[error("crouch amount {crouch_amount} leaves no capsule (height {height}, radius {radius})")]
    CrouchTooDeep {
        crouch_amount: f32,
        height: f32,
        radius: f32,
    },

    #[error("character {entity:?} has no CharacterCapsule; locomotion cannot start without a capsule shape")]
    MissingCapsule { entity: Entity },

    #[error("failed to parse character config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

fn ensure_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    // NaN тоже отсекается: сравнение с NaN всегда false
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn ensure_fraction(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::FractionOutOfRange { field, value })
    }
}

/// Capsule персонажа в стоячем положении
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct CapsuleConfig {
    /// Радиус (m)
    pub radius: f32,
    /// Полная высота стоя, включая полусферы (m)
    pub height: f32,
}

impl Default for CapsuleConfig {
    fn default() -> Self {
        Self {
            radius: 0.4,
            height: 2.0,
        }
    }
}

/// Базовое движение: скорость, walk, прыжок, гравитация, ground probe
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct MovementConfig {
    /// Базовая горизонтальная скорость (m/s)
    pub speed: f32,
    /// Делитель скорости при walk
    pub walk_divider: f32,
    /// Высота пика прыжка (m); импульс считается как sqrt(2 · h · |g|)
    pub jump_height: f32,
    /// Вертикальное ускорение (m/s², отрицательное = вниз)
    pub gravity: f32,
    /// Насколько ground probe заглядывает ниже дна capsule (m)
    pub ground_offset: f32,
    /// Слои, считающиеся землёй
    pub ground_mask: u32,
    /// Слои, блокирующие capsule move
    pub collision_mask: u32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            speed: 5.0,
            walk_divider: 2.0,
            jump_height: 1.2,
            gravity: -9.81,
            ground_offset: 0.1,
            ground_mask: ALL_LAYERS,
            collision_mask: ALL_LAYERS,
        }
    }
}

/// Crouch: глубина, делитель скорости, decrouch transition, ceiling probe
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct CrouchConfig {
    /// На сколько уменьшается высота capsule (m)
    pub crouch_amount: f32,
    /// Делитель скорости в crouch
    pub crouch_divider: f32,
    /// Длительность decrouch (s)
    pub decrouch_time: f32,
    /// Количество равных шагов decrouch
    pub decrouch_steps: u32,
    /// Интервал повторной проверки потолка пока ждём clearance (s)
    pub ceiling_poll_interval: f32,
    /// Зазор под потолком, не считающийся препятствием (m)
    pub ceiling_offset: f32,
    /// Слои, считающиеся потолком
    pub ceiling_mask: u32,
}

impl Default for CrouchConfig {
    fn default() -> Self {
        Self {
            crouch_amount: 0.5,
            crouch_divider: 3.0,
            decrouch_time: 0.7,
            decrouch_steps: 60,
            ceiling_poll_interval: 0.2,
            ceiling_offset: 0.1,
            ceiling_mask: ALL_LAYERS,
        }
    }
}

impl CrouchConfig {
    /// Пауза между шагами decrouch (s)
    pub fn decrouch_step_interval(&self) -> f32 {
        self.decrouch_time / self.decrouch_steps as f32
    }
}

/// Sprint + stamina budget
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct SprintConfig {
    /// Множитель скорости в sprint
    pub sprint_multiplier: f32,
    /// Максимум stamina (points)
    pub max_stamina: f32,
    /// Расход stamina в секунду; восстановление идёт с той же скоростью (points/s)
    pub stamina_lose_per_sec: f32,
    /// Пауза перед началом восстановления (s)
    pub stamina_increase_cooldown: f32,
    /// Доля max, после которой sprint снова разрешён
    pub min_stamina_recovered_to_notify: f32,
    /// Размер одного шага drain/recovery (points)
    pub stamina_change_step: f32,
}

impl Default for SprintConfig {
    fn default() -> Self {
        Self {
            sprint_multiplier: 1.5,
            max_stamina: 10.0,
            stamina_lose_per_sec: 1.0,
            stamina_increase_cooldown: 1.5,
            min_stamina_recovered_to_notify: 0.1,
            stamina_change_step: 0.1,
        }
    }
}

impl SprintConfig {
    /// Пауза между шагами drain/recovery (s)
    pub fn step_interval(&self) -> f32 {
        self.stamina_change_step / self.stamina_lose_per_sec
    }
}

/// Mouse look (градусы на единицу look delta)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct LookConfig {
    pub horizontal_sensitivity: f32,
    pub vertical_sensitivity: f32,
    /// Ограничение pitch вверх/вниз (deg)
    pub pitch_limit: f32,
}

impl Default for LookConfig {
    fn default() -> Self {
        Self {
            horizontal_sensitivity: 1.0,
            vertical_sensitivity: 0.2,
            pitch_limit: 90.0,
        }
    }
}

/// Взаимодействие с объектами
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct InteractionConfig {
    /// Дальность луча от глаз (m)
    pub range: f32,
    pub mask: u32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            range: 1.5,
            mask: ALL_LAYERS,
        }
    }
}

/// Полный набор параметров персонажа
///
/// `crouch: None` / `sprint: None`: персонаж без соответствующего модификатора
/// (composition step пропускается, divider/multiplier нейтральные).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct CharacterConfig {
    pub capsule: CapsuleConfig,
    pub movement: MovementConfig,
    pub look: LookConfig,
    pub crouch: Option<CrouchConfig>,
    pub sprint: Option<SprintConfig>,
    pub interaction: InteractionConfig,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            capsule: CapsuleConfig::default(),
            movement: MovementConfig::default(),
            look: LookConfig::default(),
            crouch: Some(CrouchConfig::default()),
            sprint: Some(SprintConfig::default()),
            interaction: InteractionConfig::default(),
        }
    }
}

impl CharacterConfig {
    /// Парсит RON и сразу валидирует
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let capsule = &self.capsule;
        ensure_positive("capsule.radius", capsule.radius)?;
        ensure_positive("capsule.height", capsule.height)?;
        if capsule.height < capsule.radius * 2.0 {
            return Err(ConfigError::CapsuleTooShort {
                height: capsule.height,
                radius: capsule.radius,
            });
        }

        let movement = &self.movement;
        ensure_positive("movement.speed", movement.speed)?;
        ensure_positive("movement.walk_divider", movement.walk_divider)?;
        ensure_positive("movement.jump_height", movement.jump_height)?;
        // gravity со знаком: вверх или ноль ломает ground anchor
        if movement.gravity.is_nan() || movement.gravity >= 0.0 {
            return Err(ConfigError::GravityNotDownward {
                value: movement.gravity,
            });
        }
        ensure_positive("movement.ground_offset", movement.ground_offset)?;

        ensure_positive("look.pitch_limit", self.look.pitch_limit)?;
        ensure_positive("interaction.range", self.interaction.range)?;

        if let Some(crouch) = &self.crouch {
            ensure_positive("crouch.crouch_amount", crouch.crouch_amount)?;
            ensure_positive("crouch.crouch_divider", crouch.crouch_divider)?;
            ensure_positive("crouch.decrouch_time", crouch.decrouch_time)?;
            ensure_positive("crouch.decrouch_steps", crouch.decrouch_steps as f32)?;
            ensure_positive("crouch.ceiling_poll_interval", crouch.ceiling_poll_interval)?;
            if capsule.height - crouch.crouch_amount < capsule.radius * 2.0 {
                return Err(ConfigError::CrouchTooDeep {
                    crouch_amount: crouch.crouch_amount,
                    height: capsule.height,
                    radius: capsule.radius,
                });
            }
        }

        if let Some(sprint) = &self.sprint {
            ensure_positive("sprint.sprint_multiplier", sprint.sprint_multiplier)?;
            ensure_positive("sprint.max_stamina", sprint.max_stamina)?;
            ensure_positive("sprint.stamina_lose_per_sec", sprint.stamina_lose_per_sec)?;
            ensure_positive("sprint.stamina_change_step", sprint.stamina_change_step)?;
            if sprint.stamina_increase_cooldown < 0.0 {
                return Err(ConfigError::NonPositive {
                    field: "sprint.stamina_increase_cooldown",
                    value: sprint.stamina_increase_cooldown,
                });
            }
            ensure_fraction(
                "sprint.min_stamina_recovered_to_notify",
                sprint.min_stamina_recovered_to_notify,
            )?;
        }

        Ok(())
    }
}

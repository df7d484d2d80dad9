//! Physics boundary
//!
//! Ядро не знает о конкретном движке. Всё, что ему нужно от мира:
//! - sphere cast (ground/ceiling probe) → hit: bool
//! - kinematic capsule sweep-and-slide → фактически применённое смещение
//! - ray cast (interaction) → entity коллайдера
//!
//! Реализации:
//! - `headless`: AABB мир без движка (тесты, headless симуляция)
//! - `rapier`: bevy_rapier3d query pipeline

use bevy::prelude::*;

use crate::config::CapsuleConfig;

pub mod headless;
pub mod probe;
pub mod rapier;

pub use headless::{HeadlessPhysicsPlugin, HeadlessWorld, StaticBox};
pub use probe::{ceiling_cast, ground_cast, probe, GroundSensor};
pub use rapier::{RapierBackendPlugin, RapierQueries};

/// Маска "все слои"
pub const ALL_LAYERS: u32 = u32::MAX;

/// Дистанция от верха capsule до глаз (m)
pub const EYE_OFFSET_FROM_TOP: f32 = 0.1;

/// Параметры одного sphere cast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereCast {
    pub origin: Vec3,
    pub radius: f32,
    /// Единичный вектор
    pub direction: Vec3,
    pub max_distance: f32,
    pub mask: u32,
}

/// Capsule в world space для sweep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapsuleSweep {
    /// Центр capsule (world)
    pub center: Vec3,
    pub radius: f32,
    pub height: f32,
    pub mask: u32,
}

impl CapsuleSweep {
    /// Половина отрезка между центрами полусфер
    pub fn half_segment(&self) -> f32 {
        (self.height * 0.5 - self.radius).max(0.0)
    }
}

/// Пространственные запросы, которые ядро делает к физическому движку
pub trait SpatialQuery {
    /// Есть ли коллайдер из `mask` на пути сферы в пределах `max_distance`
    fn sphere_cast(&self, cast: &SphereCast) -> bool;

    /// Kinematic sweep: сдвигает capsule на `displacement`, обрезая по препятствиям.
    /// Возвращает смещение, которое реально применено.
    fn move_capsule(&self, sweep: &CapsuleSweep, displacement: Vec3) -> Vec3;

    /// Ближайший коллайдер на луче (для interaction)
    fn ray_cast(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: u32) -> Option<Entity>;
}

/// Форма capsule персонажа (единственный владелец height/center)
///
/// Инварианты:
/// - `starting_height - crouch_amount ≤ height ≤ starting_height`
/// - `center_offset.y == -(starting_height - height) / 2`: дно capsule неподвижно,
///   двигается только верх
///
/// Transform персонажа совпадает с центром capsule стоя.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct CharacterCapsule {
    pub radius: f32,
    pub height: f32,
    pub starting_height: f32,
    pub center_offset: Vec3,
}

impl CharacterCapsule {
    pub fn new(radius: f32, height: f32) -> Self {
        Self {
            radius,
            height,
            starting_height: height,
            center_offset: Vec3::ZERO,
        }
    }

    pub fn from_config(config: &CapsuleConfig) -> Self {
        Self::new(config.radius, config.height)
    }

    pub fn center(&self, translation: Vec3) -> Vec3 {
        translation + self.center_offset
    }

    pub fn bottom_y(&self, translation: Vec3) -> f32 {
        self.center(translation).y - self.height * 0.5
    }

    pub fn top_y(&self, translation: Vec3) -> f32 {
        self.center(translation).y + self.height * 0.5
    }

    pub fn eye_position(&self, translation: Vec3) -> Vec3 {
        let center = self.center(translation);
        Vec3::new(center.x, self.top_y(translation) - EYE_OFFSET_FROM_TOP, center.z)
    }

    /// Насколько capsule сейчас ниже стоячей высоты
    pub fn height_delta(&self) -> f32 {
        self.starting_height - self.height
    }

    /// Устанавливает высоту, сохраняя дно capsule на месте
    pub fn set_height_keep_bottom(&mut self, height: f32) {
        self.height = height;
        self.center_offset.y = -(self.starting_height - height) * 0.5;
    }

    /// Стоячая форма (respawn / конец decrouch)
    pub fn reset(&mut self) {
        self.height = self.starting_height;
        self.center_offset = Vec3::ZERO;
    }

    pub fn sweep_at(&self, translation: Vec3, mask: u32) -> CapsuleSweep {
        CapsuleSweep {
            center: self.center(translation),
            radius: self.radius,
            height: self.height,
            mask,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capsule_keep_bottom() {
        let mut capsule = CharacterCapsule::new(0.4, 2.0);
        let translation = Vec3::new(0.0, 1.0, 0.0);
        let bottom = capsule.bottom_y(translation);

        capsule.set_height_keep_bottom(1.5);

        assert!((capsule.bottom_y(translation) - bottom).abs() < 1e-6);
        assert!((capsule.top_y(translation) - 2.5).abs() < 1e-6);
        assert_eq!(capsule.center_offset.y, -0.25);
    }

    #[test]
    fn test_capsule_reset() {
        let mut capsule = CharacterCapsule::new(0.4, 2.0);
        capsule.set_height_keep_bottom(1.5);
        capsule.reset();

        assert_eq!(capsule.height, 2.0);
        assert_eq!(capsule.center_offset, Vec3::ZERO);
        assert_eq!(capsule.height_delta(), 0.0);
    }

    #[test]
    fn test_eye_position_follows_top() {
        let capsule = CharacterCapsule::new(0.4, 2.0);
        let eye = capsule.eye_position(Vec3::new(1.0, 1.0, 2.0));
        assert!((eye.y - (2.0 - EYE_OFFSET_FROM_TOP)).abs() < 1e-6);
        assert_eq!(eye.x, 1.0);
        assert_eq!(eye.z, 2.0);
    }
}

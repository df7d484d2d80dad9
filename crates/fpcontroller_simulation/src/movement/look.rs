//! First-person look (yaw тела + pitch камеры)
//!
//! Тело вращается только по yaw, поэтому горизонтальный базис движения
//! никогда не наклоняется. Pitch нужен только камере и interaction лучу.

use bevy::prelude::*;

use crate::config::LookConfig;

#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct LookController {
    pub config: LookConfig,
    /// Градусы, положительный = поворот вправо
    pub yaw: f32,
    /// Градусы, положительный = взгляд вниз
    pub pitch: f32,
}

impl LookController {
    pub fn new(config: LookConfig) -> Self {
        Self {
            config,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    pub fn apply_delta(&mut self, delta: Vec2) {
        let limit = self.config.pitch_limit;
        self.yaw += delta.x * self.config.horizontal_sensitivity;
        self.pitch = (self.pitch - delta.y * self.config.vertical_sensitivity).clamp(-limit, limit);
    }

    /// Rotation тела (только yaw)
    pub fn body_rotation(&self) -> Quat {
        Quat::from_rotation_y(-self.yaw.to_radians())
    }

    /// Rotation камеры (yaw + pitch)
    pub fn view_rotation(&self) -> Quat {
        self.body_rotation() * Quat::from_rotation_x(-self.pitch.to_radians())
    }

    /// (forward, right) в горизонтальной плоскости
    pub fn basis(&self) -> (Vec3, Vec3) {
        let rotation = self.body_rotation();
        (rotation * Vec3::NEG_Z, rotation * Vec3::X)
    }

    pub fn view_direction(&self) -> Vec3 {
        self.view_rotation() * Vec3::NEG_Z
    }

    pub fn reset(&mut self) {
        self.yaw = 0.0;
        self.pitch = 0.0;
    }
}

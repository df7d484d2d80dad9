//! Input компоненты персонажа

use bevy::prelude::*;

/// Непрерывные оси input (читаются каждый frame)
///
/// Для headless тестов: mock input через этот компонент.
/// Для игры: заполняется input binding слоем.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct PlayerAxes {
    /// x = right, y = forward, каждая в [-1, 1]
    pub move_axis: Vec2,
    /// Look delta за frame (x = yaw, y = pitch)
    pub look_delta: Vec2,
}

/// Маркер управляемого игроком персонажа
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Player;

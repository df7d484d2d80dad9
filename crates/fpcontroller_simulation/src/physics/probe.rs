//! Ground / ceiling probe
//!
//! Обе проверки: sphere cast из центра capsule радиусом capsule.
//! - ground: вниз, до дна capsule + `ground_offset` (FixedUpdate)
//! - ceiling: вверх, до того места, где был бы верх capsule стоя, минус `ceiling_offset` (Update)
//!
//! "Нет попадания": нормальное состояние, не ошибка.

use bevy::prelude::*;

use super::{CharacterCapsule, SpatialQuery, SphereCast};

/// Закэшированные результаты последних probe
///
/// Пишется probe системами, читается интегратором и crouch до следующего probe.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct GroundSensor {
    pub grounded: bool,
    pub ceiling_blocked: bool,
}

pub fn probe(queries: &impl SpatialQuery, cast: &SphereCast) -> bool {
    queries.sphere_cast(cast)
}

pub fn ground_cast(capsule: &CharacterCapsule, translation: Vec3, ground_offset: f32, mask: u32) -> SphereCast {
    SphereCast {
        origin: capsule.center(translation),
        radius: capsule.radius,
        direction: Vec3::NEG_Y,
        max_distance: (capsule.height * 0.5 - capsule.radius).max(0.0) + ground_offset,
        mask,
    }
}

pub fn ceiling_cast(capsule: &CharacterCapsule, translation: Vec3, ceiling_offset: f32, mask: u32) -> SphereCast {
    // Верх сферы доходит до bottom + starting_height - ceiling_offset независимо от текущей высоты
    let reach = capsule.height_delta() + capsule.height * 0.5 - capsule.radius - ceiling_offset;

    SphereCast {
        origin: capsule.center(translation),
        radius: capsule.radius,
        direction: Vec3::Y,
        max_distance: reach.max(0.0),
        mask,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ground_cast_reaches_below_bottom() {
        let capsule = CharacterCapsule::new(0.4, 2.0);
        let translation = Vec3::new(0.0, 1.0, 0.0);
        let cast = ground_cast(&capsule, translation, 0.1, u32::MAX);

        // нижняя точка сферы в конце cast
        let lowest = cast.origin.y - cast.max_distance - cast.radius;
        assert!((lowest - (capsule.bottom_y(translation) - 0.1)).abs() < 1e-5);
        assert_eq!(cast.direction, Vec3::NEG_Y);
    }

    #[test]
    fn test_ceiling_cast_targets_standing_top() {
        let mut capsule = CharacterCapsule::new(0.3, 2.0);
        let translation = Vec3::new(0.0, 1.0, 0.0);
        let standing_top = capsule.top_y(translation);

        capsule.set_height_keep_bottom(1.5);
        let cast = ceiling_cast(&capsule, translation, 0.1, u32::MAX);

        let highest = cast.origin.y + cast.max_distance + cast.radius;
        assert!((highest - (standing_top - 0.1)).abs() < 1e-5);
    }
}

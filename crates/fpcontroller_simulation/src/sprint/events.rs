//! Stamina events

use bevy::prelude::*;

/// Event: stamina кончилась во время sprint
///
/// Sprint принудительно остановлен, повторный engage игнорируется до `StaminaRecovered`.
#[derive(Event, Debug, Clone)]
pub struct StaminaEmpty {
    pub entity: Entity,
}

/// Event: восстановление пересекло `min_stamina_recovered_to_notify`, sprint снова разрешён
///
/// Не больше одного раза за цикл восстановления.
#[derive(Event, Debug, Clone)]
pub struct StaminaRecovered {
    pub entity: Entity,
}

/// Event: stamina изменилась (для UI индикатора), fraction в [0, 1]
#[derive(Event, Debug, Clone)]
pub struct StaminaFractionChanged {
    pub entity: Entity,
    pub fraction: f32,
}

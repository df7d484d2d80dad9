//! Sprint + stamina
//!
//! Idle(full) → Draining → (пусто / release) → Cooldown → Recovering → Idle
//!
//! Stamina меняется дискретными шагами `stamina_change_step` с интервалом
//! `step / stamina_lose_per_sec`, восстановление идёт с той же скоростью.
//! Значение всегда в [0, max]; на границах ставится точное значение.

use bevy::prelude::*;

use crate::config::SprintConfig;

pub mod events;
pub mod systems;

#[cfg(test)]
mod stamina_tests;

pub use events::*;
pub use systems::update_sprint;

/// Порог "stamina кончилась" (компенсирует накопленную ошибку шагов)
pub const STAMINA_EPSILON: f32 = 1e-4;

/// Фаза stamina/sprint
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum SprintPhase {
    /// Не бежим, stamina полная
    Idle,
    /// Бежим; следующий шаг расхода через `step_timer`
    Draining { step_timer: f32 },
    /// Пауза перед восстановлением
    Cooldown { remaining: f32 },
    /// Восстановление; `notified`: StaminaRecovered уже был в этом цикле
    Recovering { step_timer: f32, notified: bool },
}

impl SprintPhase {
    pub fn name(&self) -> &'static str {
        match self {
            SprintPhase::Idle => "Idle",
            SprintPhase::Draining { .. } => "Draining",
            SprintPhase::Cooldown { .. } => "Cooldown",
            SprintPhase::Recovering { .. } => "Recovering",
        }
    }
}

/// Что произошло за один tick (для событий и UI)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StaminaTickOutcome {
    pub emptied: bool,
    pub recovered: bool,
    pub fraction_changed: bool,
}

/// Sprint модификатор персонажа
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct SprintController {
    pub config: SprintConfig,
    phase: SprintPhase,
    current: f32,
    able_to_sprint: bool,
    multiplier: f32,
    /// Исчерпание на release, ещё не отданное через tick
    pending_empty: bool,
}

impl SprintController {
    pub fn new(config: SprintConfig) -> Self {
        Self {
            current: config.max_stamina,
            config,
            phase: SprintPhase::Idle,
            able_to_sprint: true,
            multiplier: 1.0,
            pending_empty: false,
        }
    }

    pub fn phase(&self) -> SprintPhase {
        self.phase
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    /// current / max
    pub fn fraction(&self) -> f32 {
        self.current / self.config.max_stamina
    }

    /// Текущий множитель скорости (≥ 1)
    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }

    pub fn is_sprinting(&self) -> bool {
        matches!(self.phase, SprintPhase::Draining { .. })
    }

    pub fn able_to_sprint(&self) -> bool {
        self.able_to_sprint
    }

    /// Начать sprint. Игнорируется после исчерпания, пока stamina не восстановилась.
    ///
    /// Первый шаг расхода выполняется на ближайшем tick. Прерывает восстановление.
    pub fn engage(&mut self) -> bool {
        if !self.able_to_sprint || self.is_sprinting() {
            return false;
        }

        self.multiplier = self.config.sprint_multiplier;
        self.phase = SprintPhase::Draining { step_timer: 0.0 };
        true
    }

    /// Отпустить sprint → cooldown. Без sprint: игнорируется.
    ///
    /// Если stamina уже на нуле, это исчерпание: `emptied` придёт в ближайшем tick.
    pub fn release(&mut self) -> bool {
        if !self.is_sprinting() {
            return false;
        }

        if self.current <= STAMINA_EPSILON {
            self.exhaust();
            self.pending_empty = true;
            return true;
        }

        self.multiplier = 1.0;
        self.phase = SprintPhase::Cooldown {
            remaining: self.config.stamina_increase_cooldown,
        };
        true
    }

    fn exhaust(&mut self) {
        self.current = 0.0;
        self.multiplier = 1.0;
        self.able_to_sprint = false;
        self.phase = SprintPhase::Cooldown {
            remaining: self.config.stamina_increase_cooldown,
        };
    }

    /// Продвигает drain/cooldown/recovery на `delta` секунд
    pub fn tick(&mut self, delta: f32) -> StaminaTickOutcome {
        let emptied = std::mem::take(&mut self.pending_empty);
        let mut outcome = StaminaTickOutcome {
            emptied,
            fraction_changed: emptied,
            ..default()
        };
        let mut budget = delta;
        let interval = self.config.step_interval();
        let max = self.config.max_stamina;

        loop {
            match self.phase {
                SprintPhase::Idle => return outcome,

                SprintPhase::Draining { step_timer } => {
                    if step_timer > budget {
                        self.phase = SprintPhase::Draining {
                            step_timer: step_timer - budget,
                        };
                        return outcome;
                    }
                    budget -= step_timer;

                    if self.current <= STAMINA_EPSILON {
                        self.exhaust();
                        outcome.emptied = true;
                        outcome.fraction_changed = true;
                        continue;
                    }

                    self.current = (self.current - self.config.stamina_change_step).max(0.0);
                    outcome.fraction_changed = true;
                    self.phase = SprintPhase::Draining { step_timer: interval };
                }

                SprintPhase::Cooldown { remaining } => {
                    if remaining > budget {
                        self.phase = SprintPhase::Cooldown {
                            remaining: remaining - budget,
                        };
                        return outcome;
                    }
                    budget -= remaining;

                    // уже выше порога → пересечения не будет, событие не нужно
                    let notified = self.able_to_sprint
                        && self.fraction() >= self.config.min_stamina_recovered_to_notify;
                    self.phase = SprintPhase::Recovering {
                        step_timer: 0.0,
                        notified,
                    };
                }

                SprintPhase::Recovering {
                    step_timer,
                    mut notified,
                } => {
                    if step_timer > budget {
                        self.phase = SprintPhase::Recovering {
                            step_timer: step_timer - budget,
                            notified,
                        };
                        return outcome;
                    }
                    budget -= step_timer;

                    self.current = (self.current + self.config.stamina_change_step).min(max);
                    outcome.fraction_changed = true;

                    if !notified && self.fraction() >= self.config.min_stamina_recovered_to_notify {
                        self.able_to_sprint = true;
                        notified = true;
                        outcome.recovered = true;
                    }

                    if self.current >= max - STAMINA_EPSILON {
                        self.current = max;
                        self.phase = SprintPhase::Idle;
                    } else {
                        self.phase = SprintPhase::Recovering {
                            step_timer: interval,
                            notified,
                        };
                    }
                }
            }
        }
    }

    /// Respawn: полная stamina, без sprint
    pub fn reset(&mut self) {
        self.phase = SprintPhase::Idle;
        self.current = self.config.max_stamina;
        self.able_to_sprint = true;
        self.multiplier = 1.0;
        self.pending_empty = false;
    }
}

//! Crouch state machine
//!
//! Standing → Crouched → (release) → Decrouching → Standing
//!                     ↘ WaitingForClearance ↗  (потолок над головой)
//!
//! - engage мгновенный: высота capsule уменьшается на `crouch_amount`, дно остаётся на месте
//! - decrouch: `decrouch_steps` равных шагов за `decrouch_time`, последний шаг
//!   ставит точную стоячую форму
//! - пока потолок заблокирован, decrouch стоит на паузе
//!
//! Таймеры продвигаются frame clock'ом. Если frame длиннее шага: все
//! наступившие шаги выполняются в этом же frame.

use bevy::prelude::*;

use crate::config::CrouchConfig;
use crate::physics::{ceiling_cast, probe, CharacterCapsule, SpatialQuery};

pub mod systems;


pub use systems::update_crouch;

/// Фаза crouch
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum CrouchPhase {
    Standing,
    Crouched,
    /// Release был, но потолок мешает; перепроверяем каждые `ceiling_poll_interval`
    WaitingForClearance { poll_timer: f32 },
    Decrouching {
        steps_done: u32,
        /// Время до следующего шага (s)
        step_timer: f32,
        /// Прирост высоты за шаг (m)
        height_step: f32,
    },
}

impl CrouchPhase {
    pub fn name(&self) -> &'static str {
        match self {
            CrouchPhase::Standing => "Standing",
            CrouchPhase::Crouched => "Crouched",
            CrouchPhase::WaitingForClearance { .. } => "WaitingForClearance",
            CrouchPhase::Decrouching { .. } => "Decrouching",
        }
    }
}

/// Crouch модификатор персонажа
///
/// Единственный, кто меняет высоту/центр `CharacterCapsule`.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct CrouchController {
    pub config: CrouchConfig,
    phase: CrouchPhase,
    divider: f32,
    ceiling_blocked: bool,
}

impl CrouchController {
    pub fn new(config: CrouchConfig) -> Self {
        Self {
            config,
            phase: CrouchPhase::Standing,
            divider: 1.0,
            ceiling_blocked: false,
        }
    }

    pub fn phase(&self) -> CrouchPhase {
        self.phase
    }

    /// Текущий делитель скорости (≥ 1)
    pub fn divider(&self) -> f32 {
        self.divider
    }

    /// Capsule сейчас ниже стоячей (включая ожидание и decrouch)
    pub fn is_crouched(&self) -> bool {
        !matches!(self.phase, CrouchPhase::Standing)
    }

    pub fn ceiling_blocked(&self) -> bool {
        self.ceiling_blocked
    }

    /// Прогресс decrouch в [0, 1]; вне decrouch: 0
    pub fn transition_progress(&self) -> f32 {
        match self.phase {
            CrouchPhase::Decrouching { steps_done, .. } => {
                (steps_done as f32 / self.config.decrouch_steps as f32).min(1.0)
            }
            _ => 0.0,
        }
    }

    pub fn set_ceiling_blocked(&mut self, blocked: bool) {
        self.ceiling_blocked = blocked;
    }

    /// Ceiling probe; стоя не проверяем (и считаем свободным)
    pub fn probe_ceiling(&self, queries: &impl SpatialQuery, capsule: &CharacterCapsule, translation: Vec3) -> bool {
        if self.phase == CrouchPhase::Standing {
            return false;
        }

        let cast = ceiling_cast(capsule, translation, self.config.ceiling_offset, self.config.ceiling_mask);
        probe(queries, &cast)
    }

    /// Присесть. Из decrouch/ожидания: отмена перехода и абсолютная crouch форма.
    ///
    /// Возвращает false, если уже сидим.
    pub fn engage(&mut self, capsule: &mut CharacterCapsule) -> bool {
        if self.phase == CrouchPhase::Crouched {
            return false;
        }

        // абсолютные значения: никакого остатка от прерванного decrouch
        capsule.set_height_keep_bottom(capsule.starting_height - self.config.crouch_amount);
        self.divider = self.config.crouch_divider;
        self.phase = CrouchPhase::Crouched;
        true
    }

    /// Встать. Если потолок мешает: ждём clearance, иначе сразу первый шаг decrouch.
    ///
    /// Возвращает true, если форма capsule изменилась.
    pub fn release(&mut self, capsule: &mut CharacterCapsule) -> bool {
        if self.phase != CrouchPhase::Crouched {
            return false;
        }

        if self.ceiling_blocked {
            self.phase = CrouchPhase::WaitingForClearance {
                poll_timer: self.config.ceiling_poll_interval,
            };
            return false;
        }

        self.begin_decrouch();
        self.tick(0.0, capsule)
    }

    fn begin_decrouch(&mut self) {
        // Divider сбрасывается в начале decrouch, а не в конце
        self.divider = 1.0;
        self.phase = CrouchPhase::Decrouching {
            steps_done: 0,
            step_timer: 0.0,
            height_step: self.config.crouch_amount / self.config.decrouch_steps as f32,
        };
    }

    /// Продвигает ожидание/decrouch на `delta` секунд.
    ///
    /// Возвращает true, если форма capsule изменилась.
    pub fn tick(&mut self, delta: f32, capsule: &mut CharacterCapsule) -> bool {
        let mut budget = delta;
        let mut reshaped = false;

        loop {
            match self.phase {
                CrouchPhase::Standing | CrouchPhase::Crouched => return reshaped,

                CrouchPhase::WaitingForClearance { poll_timer } => {
                    if poll_timer > budget {
                        self.phase = CrouchPhase::WaitingForClearance {
                            poll_timer: poll_timer - budget,
                        };
                        return reshaped;
                    }
                    budget -= poll_timer;

                    if self.ceiling_blocked {
                        self.phase = CrouchPhase::WaitingForClearance {
                            poll_timer: self.config.ceiling_poll_interval,
                        };
                    } else {
                        self.begin_decrouch();
                    }
                }

                CrouchPhase::Decrouching {
                    steps_done,
                    step_timer,
                    height_step,
                } => {
                    if self.ceiling_blocked {
                        return reshaped;
                    }

                    if step_timer > budget {
                        self.phase = CrouchPhase::Decrouching {
                            steps_done,
                            step_timer: step_timer - budget,
                            height_step,
                        };
                        return reshaped;
                    }
                    budget -= step_timer;
                    reshaped = true;

                    if steps_done < self.config.decrouch_steps {
                        let height = (capsule.height + height_step).min(capsule.starting_height);
                        capsule.set_height_keep_bottom(height);
                        self.phase = CrouchPhase::Decrouching {
                            steps_done: steps_done + 1,
                            step_timer: self.config.decrouch_step_interval(),
                            height_step,
                        };
                    } else {
                        // финальный clamp убирает накопленную ошибку шагов
                        capsule.reset();
                        self.phase = CrouchPhase::Standing;
                    }
                }
            }
        }
    }

    /// Respawn: стоя, divider 1, форма capsule стоячая
    pub fn reset(&mut self, capsule: &mut CharacterCapsule) {
        self.phase = CrouchPhase::Standing;
        self.divider = 1.0;
        self.ceiling_blocked = false;
        capsule.reset();
    }
}

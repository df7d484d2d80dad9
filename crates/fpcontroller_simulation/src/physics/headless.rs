//! Headless physics backend (без движка)
//!
//! Мир: набор статических AABB. Достаточно для тестов и headless симуляции:
//! - sphere cast = ray cast по box'ам, расширенным на радиус сферы
//! - capsule move = покомпонентный swept-AABB clip (X, Z, затем Y) с contact skin;
//!   покомпонентное разрешение даёт скольжение вдоль стен
//! - ray cast = ближайший box; box без entity просто загораживает луч

use bevy::prelude::*;

use super::{CapsuleSweep, SpatialQuery, SphereCast};
use crate::crouch::CrouchController;
use crate::interaction::{self, InteractableRegistry, InteractionFocus};
use crate::movement::{self, LocomotionIntegrator, MoveQueryData};
use crate::{LocomotionSet, LookController};

/// Зазор, который capsule держит до препятствия
pub const CONTACT_SKIN: f32 = 0.001;

/// Допуск перекрытия по "боковым" осям при sweep
const OVERLAP_EPSILON: f32 = 1e-5;

/// Статический box (пол, стена, потолок, интерактивный объект)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticBox {
    pub min: Vec3,
    pub max: Vec3,
    pub layers: u32,
    /// Entity коллайдера (для interaction ray cast)
    pub entity: Option<Entity>,
}

impl StaticBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min,
            max,
            layers: super::ALL_LAYERS,
            entity: None,
        }
    }

    pub fn with_layers(mut self, layers: u32) -> Self {
        self.layers = layers;
        self
    }

    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.entity = Some(entity);
        self
    }

    fn matches(&self, mask: u32) -> bool {
        self.layers & mask != 0
    }
}

/// Геометрия headless мира
#[derive(Resource, Debug, Clone, Default)]
pub struct HeadlessWorld {
    pub boxes: Vec<StaticBox>,
}

impl HeadlessWorld {
    /// Мир с бесконечным (практически) полом, верх которого на `floor_y`
    pub fn with_floor(floor_y: f32) -> Self {
        let mut world = Self::default();
        world.add_box(StaticBox::new(
            Vec3::new(-1000.0, floor_y - 1.0, -1000.0),
            Vec3::new(1000.0, floor_y, 1000.0),
        ));
        world
    }

    pub fn add_box(&mut self, static_box: StaticBox) -> &mut Self {
        self.boxes.push(static_box);
        self
    }

    /// Убирает все box'ы, принадлежащие entity (подобранный предмет)
    pub fn remove_entity(&mut self, entity: Entity) {
        self.boxes.retain(|b| b.entity != Some(entity));
    }

    /// Сколько capsule может пройти вдоль одной оси, прежде чем упрётся в box
    fn clip_axis(&self, center: Vec3, half: Vec3, axis: usize, delta: f32, mask: u32) -> f32 {
        if delta == 0.0 {
            return 0.0;
        }

        let mut allowed = delta.abs();
        for b in self.boxes.iter().filter(|b| b.matches(mask)) {
            let overlaps_sides = (0..3).filter(|&other| other != axis).all(|other| {
                center[other] - half[other] < b.max[other] - OVERLAP_EPSILON
                    && center[other] + half[other] > b.min[other] + OVERLAP_EPSILON
            });
            if !overlaps_sides {
                continue;
            }

            let gap = if delta > 0.0 {
                b.min[axis] - (center[axis] + half[axis])
            } else {
                (center[axis] - half[axis]) - b.max[axis]
            };

            // box позади или уже внутри: не блокирует движение наружу
            if gap < -OVERLAP_EPSILON {
                continue;
            }

            allowed = allowed.min((gap - CONTACT_SKIN).max(0.0));
        }

        allowed * delta.signum()
    }
}

/// Slab ray/AABB: дистанция входа (0 если origin внутри)
fn ray_aabb(origin: Vec3, direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let mut t_enter = 0.0_f32;
    let mut t_exit = f32::INFINITY;

    for axis in 0..3 {
        let o = origin[axis];
        let d = direction[axis];
        if d.abs() < f32::EPSILON {
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let mut t0 = (min[axis] - o) * inv;
        let mut t1 = (max[axis] - o) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_enter = t_enter.max(t0);
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return None;
        }
    }

    Some(t_enter)
}

impl SpatialQuery for HeadlessWorld {
    fn sphere_cast(&self, cast: &SphereCast) -> bool {
        let inflate = Vec3::splat(cast.radius);
        self.boxes
            .iter()
            .filter(|b| b.matches(cast.mask))
            .filter_map(|b| ray_aabb(cast.origin, cast.direction, b.min - inflate, b.max + inflate))
            .any(|distance| distance <= cast.max_distance)
    }

    fn move_capsule(&self, sweep: &CapsuleSweep, displacement: Vec3) -> Vec3 {
        let half = Vec3::new(sweep.radius, sweep.height * 0.5, sweep.radius);
        let mut center = sweep.center;

        // X, Z, потом Y: горизонталь не цепляется за пол под ногами
        for axis in [0, 2, 1] {
            let step = self.clip_axis(center, half, axis, displacement[axis], sweep.mask);
            center[axis] += step;
        }

        center - sweep.center
    }

    fn ray_cast(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: u32) -> Option<Entity> {
        self.boxes
            .iter()
            .filter(|b| b.matches(mask))
            .filter_map(|b| ray_aabb(origin, direction, b.min, b.max).map(|t| (t, b)))
            .filter(|(t, _)| *t <= max_distance)
            .min_by(|(a, _), (b, _)| a.total_cmp(b))
            .and_then(|(_, b)| b.entity)
    }
}

/// Ground probe (FixedUpdate)
fn probe_ground_headless(
    world: Res<HeadlessWorld>,
    mut characters: Query<(
        &LocomotionIntegrator,
        &super::CharacterCapsule,
        &Transform,
        &mut super::GroundSensor,
    )>,
) {
    for (integrator, capsule, transform, mut sensor) in characters.iter_mut() {
        sensor.grounded = integrator.probe_ground(&*world, capsule, transform.translation);
    }
}

/// Ceiling probe (каждый frame, пока персонаж не стоит)
fn probe_ceiling_headless(
    world: Res<HeadlessWorld>,
    mut characters: Query<(
        &CrouchController,
        &super::CharacterCapsule,
        &Transform,
        &mut super::GroundSensor,
    )>,
) {
    for (crouch, capsule, transform, mut sensor) in characters.iter_mut() {
        sensor.ceiling_blocked = crouch.probe_ceiling(&*world, capsule, transform.translation);
    }
}

fn move_characters_headless(
    world: Res<HeadlessWorld>,
    time: Res<Time>,
    mut characters: Query<MoveQueryData>,
) {
    let delta = time.delta_secs();

    for item in characters.iter_mut() {
        movement::move_character(&*world, item, delta);
    }
}

fn focus_interactables_headless(
    world: Res<HeadlessWorld>,
    registry: Res<InteractableRegistry>,
    interactables: Query<&interaction::Interactable>,
    mut viewers: Query<(
        Entity,
        &LookController,
        &super::CharacterCapsule,
        &Transform,
        &mut InteractionFocus,
    )>,
    mut prompts: EventWriter<interaction::InteractionPromptChanged>,
) {
    for (viewer, look, capsule, transform, mut focus) in viewers.iter_mut() {
        let hit = interaction::cast_view_ray(&*world, look, capsule, transform.translation, &focus);
        interaction::refresh_focus(viewer, hit, &registry, &interactables, &mut focus, &mut prompts);
    }
}

/// Box'ы despawn'нутых entity (подобранные предметы) больше не загораживают мир
fn prune_despawned_boxes(mut world: ResMut<HeadlessWorld>, entities: Query<Entity>) {
    let stale: Vec<Entity> = world
        .boxes
        .iter()
        .filter_map(|b| b.entity)
        .filter(|entity| !entities.contains(*entity))
        .collect();

    for entity in stale {
        world.remove_entity(entity);
    }
}

/// Подключает headless backend к `LocomotionSet`
///
/// Геометрия берётся из `HeadlessWorld` resource (пустой мир по умолчанию).
pub struct HeadlessPhysicsPlugin;

impl Plugin for HeadlessPhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HeadlessWorld>()
            .add_systems(FixedUpdate, probe_ground_headless)
            .add_systems(Update, probe_ceiling_headless.in_set(LocomotionSet::Sense))
            .add_systems(Update, move_characters_headless.in_set(LocomotionSet::Move))
            .add_systems(
                Update,
                (prune_despawned_boxes, focus_interactables_headless)
                    .chain()
                    .in_set(LocomotionSet::Focus),
            );
    }
}

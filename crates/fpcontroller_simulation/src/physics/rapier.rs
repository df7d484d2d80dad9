//! Rapier backend
//!
//! Архитектура:
//! - персонаж = RigidBody::KinematicPositionBased + capsule Collider (compound со смещённым центром)
//! - velocity интегрируем сами, Rapier используется только как query pipeline
//! - все запросы исключают собственный коллайдер персонажа
//!
//! `RapierPhysicsPlugin` подключает приложение, этот plugin только добавляет наши системы.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::{CapsuleSweep, CharacterCapsule, GroundSensor, SpatialQuery, SphereCast};
use crate::crouch::CrouchController;
use crate::interaction::{self, Interactable, InteractableRegistry, InteractionFocus, InteractionPromptChanged};
use crate::movement::{self, LocomotionIntegrator, MoveQueryData};
use crate::{LocomotionSet, LookController};

/// Сколько раз capsule может "соскользнуть" по поверхности за один move
const MAX_SLIDE_ITERATIONS: usize = 2;

/// Adapter `SpatialQuery` поверх rapier query pipeline
pub struct RapierQueries<'a> {
    context: &'a RapierContext<'a>,
    exclude: Option<Entity>,
    skin: f32,
}

impl<'a> RapierQueries<'a> {
    pub fn new(context: &'a RapierContext<'a>) -> Self {
        Self {
            context,
            exclude: None,
            skin: super::headless::CONTACT_SKIN,
        }
    }

    /// Исключает коллайдер персонажа из всех запросов
    pub fn excluding(mut self, entity: Entity) -> Self {
        self.exclude = Some(entity);
        self
    }

    fn filter(&self, mask: u32) -> QueryFilter<'static> {
        let mut filter = QueryFilter::new().groups(collision_groups(mask));
        if let Some(entity) = self.exclude {
            filter = filter.exclude_collider(entity);
        }
        filter
    }

    /// Один shape cast capsule; возвращает пройденную дистанцию и нормаль препятствия
    fn sweep_once(&self, collider: &Collider, center: Vec3, displacement: Vec3, mask: u32) -> (f32, Option<Vec3>) {
        let distance = displacement.length();
        let direction = displacement / distance;

        let hit = self.context.cast_shape(
            center,
            Quat::IDENTITY,
            direction,
            &*collider.raw,
            // уже касаемся и уходим от поверхности → не блокируем
            ShapeCastOptions {
                max_time_of_impact: distance,
                target_distance: 0.0,
                stop_at_penetration: false,
                compute_impact_geometry_on_penetration: true,
            },
            self.filter(mask),
        );

        match hit {
            Some((_, hit)) => {
                let travelled = (hit.time_of_impact - self.skin).max(0.0);
                (travelled, hit.details.map(|details| details.normal1))
            }
            None => (distance, None),
        }
    }
}

/// Маска слоёв → rapier groups (персонаж в группе ALL, фильтр по mask)
pub fn collision_groups(mask: u32) -> CollisionGroups {
    CollisionGroups::new(Group::ALL, Group::from_bits_truncate(mask))
}

/// Остаток смещения после удара, спроецированный на плоскость препятствия
pub fn slide_remainder(remaining: Vec3, normal: Vec3) -> Vec3 {
    remaining - normal * remaining.dot(normal)
}

/// Collider персонажа: capsule, центр которой смещён на `center_offset`
pub fn capsule_collider(capsule: &CharacterCapsule) -> Collider {
    let half_segment = (capsule.height * 0.5 - capsule.radius).max(0.0);
    Collider::compound(vec![(
        capsule.center_offset,
        Quat::IDENTITY,
        Collider::capsule_y(half_segment, capsule.radius),
    )])
}

impl SpatialQuery for RapierQueries<'_> {
    fn sphere_cast(&self, cast: &SphereCast) -> bool {
        let ball = Collider::ball(cast.radius);
        self.context
            .cast_shape(
                cast.origin,
                Quat::IDENTITY,
                cast.direction,
                &*ball.raw,
                ShapeCastOptions::with_max_time_of_impact(cast.max_distance),
                self.filter(cast.mask),
            )
            .is_some()
    }

    fn move_capsule(&self, sweep: &CapsuleSweep, displacement: Vec3) -> Vec3 {
        let collider = Collider::capsule_y(sweep.half_segment(), sweep.radius);
        let mut center = sweep.center;
        let mut remaining = displacement;

        for _ in 0..MAX_SLIDE_ITERATIONS {
            if remaining.length_squared() <= f32::EPSILON * f32::EPSILON {
                break;
            }

            let (travelled, normal) = self.sweep_once(&collider, center, remaining, sweep.mask);
            let direction = remaining.normalize();
            center += direction * travelled;

            match normal {
                Some(normal) => remaining = slide_remainder(remaining - direction * travelled, normal),
                None => break,
            }
        }

        center - sweep.center
    }

    fn ray_cast(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: u32) -> Option<Entity> {
        self.context
            .cast_ray(origin, direction, max_distance, true, self.filter(mask))
            .map(|(entity, _)| entity)
    }
}

/// Новым персонажам: kinematic тело и capsule collider
fn attach_character_bodies(
    mut commands: Commands,
    characters: Query<(Entity, &CharacterCapsule, &LocomotionIntegrator), Added<LocomotionIntegrator>>,
) {
    for (entity, capsule, integrator) in characters.iter() {
        commands.entity(entity).insert((
            RigidBody::KinematicPositionBased,
            capsule_collider(capsule),
            collision_groups(integrator.config.collision_mask),
        ));
    }
}

/// Crouch меняет форму capsule → пересобираем collider
fn sync_capsule_colliders(
    mut characters: Query<(&CharacterCapsule, &mut Collider), Changed<CharacterCapsule>>,
) {
    for (capsule, mut collider) in characters.iter_mut() {
        *collider = capsule_collider(capsule);
    }
}

fn probe_ground_rapier(
    rapier: ReadRapierContext,
    mut characters: Query<(Entity, &LocomotionIntegrator, &CharacterCapsule, &Transform, &mut GroundSensor)>,
) {
    let Ok(context) = rapier.single() else {
        return;
    };

    for (entity, integrator, capsule, transform, mut sensor) in characters.iter_mut() {
        let queries = RapierQueries::new(&context).excluding(entity);
        sensor.grounded = integrator.probe_ground(&queries, capsule, transform.translation);
    }
}

fn probe_ceiling_rapier(
    rapier: ReadRapierContext,
    mut characters: Query<(Entity, &CrouchController, &CharacterCapsule, &Transform, &mut GroundSensor)>,
) {
    let Ok(context) = rapier.single() else {
        return;
    };

    for (entity, crouch, capsule, transform, mut sensor) in characters.iter_mut() {
        let queries = RapierQueries::new(&context).excluding(entity);
        sensor.ceiling_blocked = crouch.probe_ceiling(&queries, capsule, transform.translation);
    }
}

fn move_characters_rapier(rapier: ReadRapierContext, time: Res<Time>, mut characters: Query<MoveQueryData>) {
    let Ok(context) = rapier.single() else {
        return;
    };
    let delta = time.delta_secs();

    for item in characters.iter_mut() {
        let queries = RapierQueries::new(&context).excluding(item.0);
        movement::move_character(&queries, item, delta);
    }
}

fn focus_interactables_rapier(
    rapier: ReadRapierContext,
    registry: Res<InteractableRegistry>,
    interactables: Query<&Interactable>,
    mut viewers: Query<(Entity, &LookController, &CharacterCapsule, &Transform, &mut InteractionFocus)>,
    mut prompts: EventWriter<InteractionPromptChanged>,
) {
    let Ok(context) = rapier.single() else {
        return;
    };

    for (viewer, look, capsule, transform, mut focus) in viewers.iter_mut() {
        let queries = RapierQueries::new(&context).excluding(viewer);
        let hit = interaction::cast_view_ray(&queries, look, capsule, transform.translation, &focus);
        interaction::refresh_focus(viewer, hit, &registry, &interactables, &mut focus, &mut prompts);
    }
}

/// Подключает Rapier backend к `LocomotionSet`
pub struct RapierBackendPlugin;

impl Plugin for RapierBackendPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (attach_character_bodies, probe_ground_rapier).chain(),
        )
        .add_systems(
            Update,
            (
                probe_ceiling_rapier.in_set(LocomotionSet::Sense),
                (move_characters_rapier, sync_capsule_colliders)
                    .chain()
                    .in_set(LocomotionSet::Move),
                focus_interactables_rapier.in_set(LocomotionSet::Focus),
            ),
        );
    }
}

//! Tests for locomotion integrator.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use crate::config::MovementConfig;
    use crate::movement::integrator::*;
    use crate::physics::{CharacterCapsule, HeadlessWorld, StaticBox};

    const FRAME: f32 = 1.0 / 60.0;

    struct Rig {
        world: HeadlessWorld,
        integrator: LocomotionIntegrator,
        capsule: CharacterCapsule,
        translation: Vec3,
    }

    impl Rig {
        fn on_floor() -> Self {
            Self {
                world: HeadlessWorld::with_floor(0.0),
                integrator: LocomotionIntegrator::new(MovementConfig::default()),
                capsule: CharacterCapsule::new(0.4, 2.0),
                translation: Vec3::new(0.0, 1.01, 0.0),
            }
        }

        fn step(&mut self, delta: f32, modifiers: SpeedModifiers) {
            let grounded = self
                .integrator
                .probe_ground(&self.world, &self.capsule, self.translation);
            let applied = self.integrator.tick(
                delta,
                grounded,
                modifiers,
                &self.capsule,
                self.translation,
                &self.world,
            );
            self.translation += applied;
        }

        fn settle(&mut self) {
            for _ in 0..30 {
                self.step(FRAME, SpeedModifiers::neutral(2.0));
            }
        }
    }

    fn modifiers(crouch: Option<f32>, walking: bool, sprint: Option<f32>) -> SpeedModifiers {
        SpeedModifiers {
            crouch_divider: crouch,
            walking,
            walk_divider: 2.0,
            sprint_multiplier: sprint,
        }
    }

    #[test]
    fn test_compose_speed_order() {
        // только base
        assert_eq!(compose_speed(5.0, modifiers(None, false, None)), 5.0);
        // sprint
        assert_eq!(compose_speed(5.0, modifiers(None, false, Some(1.5))), 7.5);
        // walk исключает sprint
        assert_eq!(compose_speed(5.0, modifiers(None, true, Some(1.5))), 2.5);
        // crouch + walk складываются
        let speed = compose_speed(5.0, modifiers(Some(3.0), true, None));
        assert!((speed - 5.0 / 3.0 / 2.0).abs() < 1e-6);
        // crouch + sprint
        let speed = compose_speed(5.0, modifiers(Some(3.0), false, Some(1.5)));
        assert!((speed - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_jump_impulse() {
        let impulse = jump_impulse(1.2, -9.81);
        assert!((impulse - (2.0_f32 * 1.2 * 9.81).sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_move_axis_normalized_in_plane() {
        let mut integrator = LocomotionIntegrator::new(MovementConfig::default());

        integrator.set_move_axis(Vec2::new(1.0, 1.0), Vec3::NEG_Z, Vec3::X);
        let intent = integrator.motion.horizontal_intent;
        assert!((intent.length() - 1.0).abs() < 1e-6);
        assert!(intent.x > 0.0 && intent.z < 0.0);
        assert_eq!(intent.y, 0.0);

        integrator.set_move_axis(Vec2::ZERO, Vec3::NEG_Z, Vec3::X);
        assert_eq!(integrator.motion.horizontal_intent, Vec3::ZERO);
    }

    #[test]
    fn test_ground_anchor_applied_before_gravity() {
        let mut rig = Rig::on_floor();
        rig.settle();

        rig.step(FRAME, SpeedModifiers::neutral(2.0));

        assert!(rig.integrator.motion.grounded);
        let expected = GROUND_ANCHOR_VELOCITY + rig.integrator.config.gravity * FRAME;
        assert!((rig.integrator.motion.vertical_velocity - expected).abs() < 1e-5);
    }

    #[test]
    fn test_ground_anchor_over_random_ticks() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut rig = Rig::on_floor();
        rig.settle();
        let rest_y = rig.translation.y;

        for _ in 0..2_000 {
            let delta = rng.gen_range(0.002..0.05);
            rig.step(delta, SpeedModifiers::neutral(2.0));

            // на земле скорость не накапливается: только anchor + один шаг гравитации
            assert!(rig.integrator.motion.grounded);
            let floor = GROUND_ANCHOR_VELOCITY + rig.integrator.config.gravity * delta;
            assert!((rig.integrator.motion.vertical_velocity - floor).abs() < 1e-4);
            assert!((rig.translation.y - rest_y).abs() < 1e-3);
        }
    }

    #[test]
    fn test_jump_reaches_configured_height() {
        let mut rig = Rig::on_floor();
        rig.settle();
        let start_y = rig.translation.y;

        rig.integrator.request_jump();
        rig.step(FRAME, SpeedModifiers::neutral(2.0));
        assert!(!rig.integrator.motion.jump_requested);

        let mut peak = rig.translation.y;
        for _ in 0..180 {
            rig.step(FRAME, SpeedModifiers::neutral(2.0));
            peak = peak.max(rig.translation.y);
        }

        let height = peak - start_y;
        assert!((height - 1.2).abs() < 0.1, "jump peak {}", height);
        // приземлились обратно
        assert!((rig.translation.y - start_y).abs() < 1e-2);
    }

    #[test]
    fn test_jump_ignored_in_air() {
        let mut rig = Rig::on_floor();
        rig.translation.y = 10.0;

        rig.integrator.request_jump();
        rig.step(FRAME, SpeedModifiers::neutral(2.0));

        assert!(!rig.integrator.motion.grounded);
        assert!(rig.integrator.motion.vertical_velocity < 0.0);
        // запрос не копится до приземления
        assert!(!rig.integrator.motion.jump_requested);
    }

    #[test]
    fn test_falls_under_gravity() {
        let mut rig = Rig::on_floor();
        rig.translation.y = 5.0;

        for _ in 0..30 {
            rig.step(FRAME, SpeedModifiers::neutral(2.0));
        }

        assert!(rig.translation.y < 5.0);
        assert!(rig.integrator.motion.vertical_velocity < -4.0);
    }

    #[test]
    fn test_walk_speed_distance() {
        let mut rig = Rig::on_floor();
        rig.settle();
        rig.integrator.set_move_axis(Vec2::Y, Vec3::NEG_Z, Vec3::X);

        for _ in 0..60 {
            rig.step(FRAME, modifiers(None, true, Some(1.5)));
        }

        // 1 s при 5 / 2
        assert!((rig.translation.z + 2.5).abs() < 1e-3, "z = {}", rig.translation.z);
    }

    #[test]
    fn test_uses_applied_displacement_at_wall() {
        let mut rig = Rig::on_floor();
        rig.world
            .add_box(StaticBox::new(Vec3::new(-5.0, 0.0, -2.0), Vec3::new(5.0, 3.0, -1.0)));
        rig.settle();
        rig.integrator.set_move_axis(Vec2::Y, Vec3::NEG_Z, Vec3::X);

        for _ in 0..120 {
            rig.step(FRAME, SpeedModifiers::neutral(2.0));
        }

        // упёрлись в стену на z = -1 (радиус 0.4)
        assert!(rig.translation.z > -0.6 - 1e-3);
        assert!(rig.translation.z < -0.55);
    }

    #[test]
    fn test_reset_clears_motion() {
        let mut integrator = LocomotionIntegrator::new(MovementConfig::default());
        integrator.set_walking(true);
        integrator.request_jump();
        integrator.motion.vertical_velocity = -12.0;

        integrator.reset();

        assert_eq!(integrator.motion, MotionState::default());
        assert!(!integrator.walking());
    }
}

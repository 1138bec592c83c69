//! Camera mode state machine
//!
//! Modes only change on explicit selection, except inside Auto which re-picks
//! a mode every `auto_mode_interval` time units. Independently the followed
//! racer is re-picked every `auto_entity_interval` units. Both timers are
//! gated on whole animation time units so nothing flickers per frame.

use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::{CameraMode, CameraState, ViewState};
use crate::consts::WORLD_UP;
use crate::race::{TrackedEntityProvider, TrackedEntityRef};
use crate::settings::CameraSettings;
use crate::spherical_to_cartesian;

pub struct CameraController<R = Pcg32> {
    settings: CameraSettings,
    rng: R,
    /// Mode Auto is currently showing
    auto_mode: CameraMode,
    entity: TrackedEntityRef,
    last_mode_tick: i64,
    last_entity_tick: i64,
    state: CameraState,
}

impl CameraController<Pcg32> {
    pub fn seeded(settings: CameraSettings, seed: u64) -> Self {
        Self::new(settings, Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> CameraController<R> {
    pub fn new(settings: CameraSettings, rng: R) -> Self {
        Self {
            settings,
            rng,
            auto_mode: CameraMode::Default,
            entity: 0,
            last_mode_tick: 0,
            last_entity_tick: 0,
            state: CameraState::default(),
        }
    }

    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    /// Racer currently followed by the tracking modes
    pub fn entity(&self) -> TrackedEntityRef {
        self.entity
    }

    /// Camera vectors from the last update
    pub fn state(&self) -> &CameraState {
        &self.state
    }

    /// Compute this frame's camera for `mode`
    pub fn update(
        &mut self,
        mode: CameraMode,
        view: &ViewState,
        entities: &impl TrackedEntityProvider,
    ) -> CameraState {
        let tick = view.time.round() as i64;
        self.reselect_entity(tick, entities.entity_count());

        let resolved = match mode {
            CameraMode::Auto => {
                self.reselect_auto_mode(tick);
                self.auto_mode
            }
            other => other,
        };

        self.state = self.resolve(resolved, view, entities);
        self.state
    }

    fn reselect_entity(&mut self, tick: i64, count: usize) {
        if count == 0 {
            self.entity = 0;
            return;
        }
        let interval = self.settings.auto_entity_interval.max(1);
        if self.last_entity_tick.saturating_add(interval) <= tick {
            self.last_entity_tick = tick;
            self.entity = self.rng.random_range(0..count);
            log::debug!("Camera now follows racer {}", self.entity);
        }
        self.entity = self.entity.min(count - 1);
    }

    fn reselect_auto_mode(&mut self, tick: i64) {
        let interval = self.settings.auto_mode_interval.max(1);
        if self.last_mode_tick.saturating_add(interval) <= tick {
            self.last_mode_tick = tick;
            self.auto_mode = CameraMode::from_selector(self.rng.random_range(0..4), &self.settings);
            log::debug!("Auto camera switched to {}", self.auto_mode.as_str());
        }
    }

    fn resolve(
        &self,
        mode: CameraMode,
        view: &ViewState,
        entities: &impl TrackedEntityProvider,
    ) -> CameraState {
        let entity = self.entity;
        match mode {
            CameraMode::Default | CameraMode::Auto => {
                let center = view.focus;
                CameraState {
                    eye: center
                        + spherical_to_cartesian(view.distance, view.azimuth, view.elevation),
                    center,
                    up: WORLD_UP,
                    mode: CameraMode::Default,
                }
            }
            CameraMode::Helicopter { height } => {
                let center = entities.position(entity);
                // Heading doubles as the up vector: the track runs up the screen
                let up = entities.tangent(entity).try_normalize().unwrap_or(DVec3::Y);
                CameraState {
                    eye: center + WORLD_UP * height,
                    center,
                    up,
                    mode,
                }
            }
            CameraMode::MotorCycle { radius, lift } => {
                let center = entities.position(entity);
                let side = entities.tangent(entity).cross(WORLD_UP).normalize_or_zero();
                CameraState {
                    eye: center + side * radius + WORLD_UP * lift,
                    center,
                    up: WORLD_UP,
                    mode,
                }
            }
            CameraMode::FirstPerson { look_ahead } => {
                let eye = entities.head_position(entity);
                let forward = entities.tangent(entity).normalize_or_zero();
                CameraState {
                    eye,
                    center: eye + forward * look_ahead,
                    up: WORLD_UP,
                    mode,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fixed set of racers with explicit poses
    struct Poses {
        poses: Vec<(DVec3, DVec3)>,
        head: DVec3,
    }

    impl TrackedEntityProvider for Poses {
        fn entity_count(&self) -> usize {
            self.poses.len()
        }

        fn position(&self, entity: TrackedEntityRef) -> DVec3 {
            self.poses[entity].0
        }

        fn tangent(&self, entity: TrackedEntityRef) -> DVec3 {
            self.poses[entity].1
        }

        fn head_position(&self, entity: TrackedEntityRef) -> DVec3 {
            self.position(entity) + self.head
        }
    }

    fn single(position: DVec3, tangent: DVec3) -> Poses {
        Poses {
            poses: vec![(position, tangent)],
            head: DVec3::new(0.0, 0.0, 0.9),
        }
    }

    fn controller() -> CameraController {
        CameraController::seeded(CameraSettings::default(), 1234)
    }

    #[test]
    fn test_default_orbit() {
        let mut camera = controller();
        let view = ViewState {
            distance: 10.0,
            azimuth: 0.0,
            elevation: 0.0,
            focus: DVec3::ZERO,
            ..Default::default()
        };
        let state = camera.update(CameraMode::Default, &view, &single(DVec3::ZERO, DVec3::Y));
        assert!(state.eye.abs_diff_eq(DVec3::new(10.0, 0.0, 0.0), 1e-12));
        assert_eq!(state.center, DVec3::ZERO);
        assert_eq!(state.up, DVec3::Z);
    }

    #[test]
    fn test_default_orbit_offsets_from_focus() {
        let mut camera = controller();
        let view = ViewState {
            distance: 2.0,
            azimuth: std::f64::consts::FRAC_PI_2,
            elevation: 0.0,
            focus: DVec3::new(1.0, 1.0, 1.0),
            ..Default::default()
        };
        let state = camera.update(CameraMode::Default, &view, &single(DVec3::ZERO, DVec3::Y));
        assert!(state.eye.abs_diff_eq(DVec3::new(1.0, 3.0, 1.0), 1e-12));
    }

    #[test]
    fn test_first_person() {
        let mut camera = controller();
        let look_ahead = 10.0;
        let state = camera.update(
            CameraMode::FirstPerson { look_ahead },
            &ViewState::default(),
            &single(DVec3::ZERO, DVec3::Y),
        );
        assert!(state.eye.abs_diff_eq(DVec3::new(0.0, 0.0, 0.9), 1e-12));
        assert!(state.center.abs_diff_eq(DVec3::new(0.0, look_ahead, 0.9), 1e-12));
        assert_eq!(state.up, DVec3::Z);
    }

    #[test]
    fn test_first_person_normalizes_tangent() {
        let mut camera = controller();
        let state = camera.update(
            CameraMode::FirstPerson { look_ahead: 2.0 },
            &ViewState::default(),
            &single(DVec3::new(1.0, 0.0, 0.0), DVec3::new(30.0, 0.0, 0.0)),
        );
        assert!(state.center.abs_diff_eq(DVec3::new(3.0, 0.0, 0.9), 1e-12));
    }

    #[test]
    fn test_helicopter() {
        let mut camera = controller();
        let state = camera.update(
            CameraMode::Helicopter { height: 50.0 },
            &ViewState::default(),
            &single(DVec3::new(3.0, 4.0, 2.0), DVec3::new(0.0, 24.0, 0.0)),
        );
        assert_eq!(state.center, DVec3::new(3.0, 4.0, 2.0));
        assert_eq!(state.eye, DVec3::new(3.0, 4.0, 52.0));
        assert!(state.up.abs_diff_eq(DVec3::Y, 1e-12));
        // Heading is perpendicular to the straight-down view on a flat track
        assert!(state.up.dot(state.view_direction()).abs() < 1e-12);
    }

    #[test]
    fn test_motorcycle() {
        let mut camera = controller();
        let state = camera.update(
            CameraMode::MotorCycle {
                radius: 20.0,
                lift: 1.0,
            },
            &ViewState::default(),
            &single(DVec3::new(0.0, 0.0, 2.0), DVec3::new(0.0, 5.0, 0.0)),
        );
        // Heading +y, so tangent x up points to +x
        assert!(state.eye.abs_diff_eq(DVec3::new(20.0, 0.0, 3.0), 1e-12));
        assert_eq!(state.center, DVec3::new(0.0, 0.0, 2.0));
        assert_eq!(state.up, DVec3::Z);
    }

    #[test]
    fn test_auto_reselects_on_interval() {
        let mut camera = controller();
        let racers = single(DVec3::ZERO, DVec3::Y);

        // Nothing is re-picked before the first interval elapses
        for step in 0..19 {
            let view = ViewState {
                time: step as f64 * 0.5,
                ..Default::default()
            };
            let state = camera.update(CameraMode::Auto, &view, &racers);
            assert_eq!(state.mode, CameraMode::Default);
        }

        let view = |time: f64| ViewState {
            time,
            ..Default::default()
        };
        let picked = camera.update(CameraMode::Auto, &view(10.0), &racers).mode;
        assert_ne!(picked, CameraMode::Auto);
        for step in 0..18 {
            let time = 10.0 + step as f64 * 0.5;
            assert_eq!(camera.update(CameraMode::Auto, &view(time), &racers).mode, picked);
        }
    }

    #[test]
    fn test_auto_is_reproducible() {
        let racers = Poses {
            poses: vec![(DVec3::ZERO, DVec3::Y); 4],
            head: DVec3::Z,
        };
        let run = |seed: u64| {
            let mut camera = CameraController::seeded(CameraSettings::default(), seed);
            (0..200)
                .map(|step| {
                    let view = ViewState {
                        time: step as f64 * 0.5,
                        ..Default::default()
                    };
                    let state = camera.update(CameraMode::Auto, &view, &racers);
                    (state.mode, camera.entity())
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(99), run(99));
    }

    #[test]
    fn test_entity_reselection_stays_in_range() {
        let mut camera = controller();
        let racers = Poses {
            poses: vec![(DVec3::ZERO, DVec3::Y); 3],
            head: DVec3::Z,
        };
        let mut seen = [false; 3];
        for step in 0..400 {
            let view = ViewState {
                time: step as f64,
                ..Default::default()
            };
            camera.update(CameraMode::Helicopter { height: 50.0 }, &view, &racers);
            assert!(camera.entity() < 3);
            seen[camera.entity()] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_entity_reselection_is_time_gated() {
        let mut camera = controller();
        let racers = Poses {
            poses: vec![(DVec3::ZERO, DVec3::Y); 4],
            head: DVec3::Z,
        };
        let interval = camera.settings().auto_entity_interval;
        let mut last_tick = 0;
        let mut current = camera.entity();
        let mut changes = 0;
        for step in 0..200 {
            let time = step as f64 * 0.5;
            let tick = time.round() as i64;
            camera.update(CameraMode::Default, &ViewState { time, ..Default::default() }, &racers);
            if time <= 4.0 {
                assert_eq!(camera.entity(), 0, "re-picked early at {}", time);
            }
            if last_tick + interval <= tick {
                last_tick = tick;
                if camera.entity() != current {
                    changes += 1;
                }
                current = camera.entity();
            } else {
                assert_eq!(camera.entity(), current, "re-picked between intervals at {}", time);
            }
        }
        assert!(changes > 0);
    }

    #[test]
    fn test_out_of_range_intervals() {
        let racers = Poses {
            poses: vec![(DVec3::ZERO, DVec3::Y); 4],
            head: DVec3::Z,
        };
        let huge = CameraSettings {
            auto_mode_interval: i64::MAX,
            auto_entity_interval: i64::MAX,
            ..Default::default()
        };
        let mut camera = CameraController::seeded(huge, 5);
        for step in 0..20 {
            let view = ViewState {
                time: step as f64 * 3.0,
                ..Default::default()
            };
            assert_eq!(camera.update(CameraMode::Auto, &view, &racers).mode, CameraMode::Default);
            assert_eq!(camera.entity(), 0);
        }

        // Non-positive intervals behave like one time unit, never per frame
        let negative = CameraSettings {
            auto_mode_interval: -3,
            auto_entity_interval: 0,
            ..Default::default()
        };
        let mut camera = CameraController::seeded(negative, 5);
        let mut picks = Vec::new();
        for step in 0..40 {
            let view = ViewState {
                time: 1.0 + step as f64 * 0.1,
                ..Default::default()
            };
            camera.update(CameraMode::Auto, &view, &racers);
            picks.push((view.time.round() as i64, camera.entity()));
        }
        for pair in picks.windows(2) {
            if pair[0].0 == pair[1].0 {
                assert_eq!(pair[0].1, pair[1].1);
            }
        }
    }

    #[test]
    fn test_explicit_mode_is_not_overridden() {
        let mut camera = controller();
        let racers = single(DVec3::ZERO, DVec3::Y);
        for step in 0..60 {
            let view = ViewState {
                time: step as f64,
                ..Default::default()
            };
            let mode = CameraMode::MotorCycle {
                radius: 20.0,
                lift: 1.0,
            };
            assert_eq!(camera.update(mode, &view, &racers).mode, mode);
        }
    }
}

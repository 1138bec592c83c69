//! Racers moving along the selected track
//!
//! Each racer is a scalar distance in [0, 1) advanced by `speed * dt`. Speeds
//! are re-drawn from a seeded PRNG once per whole animation time unit, so a
//! run is reproducible from its seed.

use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::curve::{Curve, OffsetCurve};
use crate::wrap_unit;

/// Handle to one tracked entity
pub type TrackedEntityRef = usize;

/// Read access to entities the camera can follow
pub trait TrackedEntityProvider {
    fn entity_count(&self) -> usize;
    fn position(&self, entity: TrackedEntityRef) -> DVec3;
    /// Direction of travel (not normalized)
    fn tangent(&self, entity: TrackedEntityRef) -> DVec3;
    fn head_position(&self, entity: TrackedEntityRef) -> DVec3;
}

/// One racer's motion state
#[derive(Debug, Clone)]
pub struct Racer {
    pub id: usize,
    /// Fraction of a lap, in [0, 1)
    pub distance: f64,
    /// Laps per animation time unit
    pub speed: f64,
    /// Lateral offset of the lane center the racer runs on
    pub lane_offset: f64,
    pub position: DVec3,
    pub tangent: DVec3,
}

#[derive(Debug, Clone, Copy)]
pub struct RaceParams {
    pub speed_minimum: f64,
    pub speed_multiplier: f64,
    pub head_height: f64,
}

impl Default for RaceParams {
    fn default() -> Self {
        Self {
            speed_minimum: SPEED_MINIMUM,
            speed_multiplier: SPEED_MULTIPLIER,
            head_height: HEAD_HEIGHT,
        }
    }
}

/// All racers plus their shared clock and speed RNG
pub struct RaceField {
    racers: Vec<Racer>,
    params: RaceParams,
    rng: Pcg32,
    last_time: f64,
    last_speed_tick: Option<i64>,
}

impl RaceField {
    /// `count` racers, racer i on the center of lane i
    pub fn new(count: usize, params: RaceParams, seed: u64) -> Self {
        let racers = (0..count)
            .map(|id| Racer {
                id,
                distance: 0.0,
                speed: 0.0,
                lane_offset: id as f64 + 0.5,
                position: DVec3::ZERO,
                tangent: DVec3::Y,
            })
            .collect();
        Self {
            racers,
            params,
            rng: Pcg32::seed_from_u64(seed),
            last_time: 0.0,
            last_speed_tick: None,
        }
    }

    pub fn racers(&self) -> &[Racer] {
        &self.racers
    }

    /// Move every racer to animation time `time` and resample its pose
    pub fn advance<C: Curve>(&mut self, time: f64, lanes: &OffsetCurve<C>) {
        let dt = (time - self.last_time).max(0.0);
        for racer in &mut self.racers {
            racer.distance = wrap_unit(racer.distance + dt * racer.speed);
        }
        self.last_time = time;

        // New speeds take effect from this instant on
        let tick = time.round() as i64;
        if self.last_speed_tick != Some(tick) {
            self.last_speed_tick = Some(tick);
            for racer in &mut self.racers {
                let jitter = self.rng.random::<f64>() * self.params.speed_multiplier;
                racer.speed = self.params.speed_minimum + jitter;
            }
        }

        for racer in &mut self.racers {
            racer.tangent = lanes.tangent(racer.distance);
            racer.position = match lanes.evaluate(racer.distance, racer.lane_offset) {
                Ok(position) => position,
                Err(e) => {
                    log::error!("Racer {} off the lane: {}", racer.id, e);
                    lanes.base().position(racer.distance)
                }
            };
        }
    }

    /// Put every racer back on the start line
    pub fn restart(&mut self) {
        for racer in &mut self.racers {
            racer.distance = 0.0;
        }
    }
}

impl TrackedEntityProvider for RaceField {
    fn entity_count(&self) -> usize {
        self.racers.len()
    }

    fn position(&self, entity: TrackedEntityRef) -> DVec3 {
        self.racers.get(entity).map_or(DVec3::ZERO, |r| r.position)
    }

    fn tangent(&self, entity: TrackedEntityRef) -> DVec3 {
        self.racers.get(entity).map_or(DVec3::Y, |r| r.tangent)
    }

    fn head_position(&self, entity: TrackedEntityRef) -> DVec3 {
        self.position(entity) + DVec3::Z * self.params.head_height
    }
}

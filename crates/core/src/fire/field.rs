//! Fire spots and the per-scenario fire field.
//!
//! The field owns one sub-fire per hotspot area, each with its own
//! geo-physical raster. Every tick the current front advances along the
//! simplified FARSITE growth axis, the advanced front is appended to the
//! historical terrain map, and the terrain decays toward burn-out.

use crate::core_types::{CellCoord, SimRng};
use crate::fire::geo_phys::GeoPhysField;
use crate::scenario::{FireModelParams, HotspotArea};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A single burning point with its radiated intensity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FireSpot {
    pub x: f32,
    pub y: f32,
    /// Radiated intensity; always finite and non-negative.
    pub intensity: f32,
    /// Tick at which this spot ignited, for fuel-exhaustion aging.
    pub ignition_tick: u32,
}

impl FireSpot {
    /// Tracking cell this spot belongs to.
    #[must_use]
    pub fn cell(&self) -> CellCoord {
        CellCoord::from_position(self.x, self.y)
    }

    /// Flame length as a function of intensity.
    #[must_use]
    pub fn flame_length(&self) -> f32 {
        0.0775 * self.intensity.powf(0.46)
    }
}

/// Radiated intensity at `(x, y)` from the given heat sources.
///
/// Sums anisotropic 2D-Gaussian contributions from every source within
/// `radiation_radius`. The kernel deviations are drawn once per call:
/// an integer in `[9, 11)` plus standard Gaussian noise, so two spots at
/// the same distance radiate slightly differently. Pure apart from those
/// RNG draws.
pub fn fire_intensity(
    params: &FireModelParams,
    x: f32,
    y: f32,
    sources: &[FireSpot],
    rng: &mut SimRng,
) -> f32 {
    let x_dev = rng.uniform_i32(9, 11) as f32 + rng.standard_normal();
    let y_dev = rng.uniform_i32(9, 11) as f32 + rng.standard_normal();

    let cos_angle = params.flame_angle.cos();
    let effective_height = if cos_angle == 0.0 {
        params.flame_height
    } else {
        params.flame_height / cos_angle
    };
    // Byram's flame-height relation, rescaled to MW/m by the 1e3 divisor.
    let intensity_coeff = 259.833 * effective_height.powf(2.174) / 1e3;

    let radius_sq = params.radiation_radius * params.radiation_radius;
    let mut accumulated = 0.0;
    for source in sources {
        let dx = x - source.x;
        let dy = y - source.y;
        if dx * dx + dy * dy > radius_sq {
            continue;
        }
        let kernel = 1.0 / (2.0 * std::f32::consts::PI * x_dev * y_dev);
        let exponent = -0.5 * ((dx * dx) / (x_dev * x_dev) + (dy * dy) / (y_dev * y_dev));
        accumulated += kernel * exponent.exp();
    }

    1e3 * accumulated * intensity_coeff
}

/// Per-tick displacement of a fire spot under the simplified FARSITE model.
///
/// `LB` is the length-to-breadth ratio of the elliptical growth shape for
/// wind speed `u`; `C` the resulting advance along the wind azimuth `theta`
/// for local spread rate `r`. The absolute value inside the square root
/// guards the `|LB| < 1` regime where the textbook expression would leave
/// the real domain; the model source does not define behavior there, so the
/// guard is kept as an unverified numerical workaround rather than new
/// physics.
#[must_use]
pub fn spread_step(r: f32, u: f32, theta: f32) -> (f32, f32) {
    let lb = 0.936 * (0.2566 * u).exp() + 0.461 * (-0.1548 * u).exp() - 0.397;
    let root = (lb * lb - 1.0).abs().sqrt();
    let hb = (lb + root) / (lb - root);
    let c = 0.5 * (r - r / hb);
    (c * theta.sin(), c * theta.cos())
}

/// Scalar spread speed at a location, for consumers of sensed snapshots.
#[must_use]
pub fn propagation_velocity(r: f32, u: f32, theta: f32) -> f32 {
    let (dx, dy) = spread_step(r, u, theta);
    (dx * dx + dy * dy).sqrt()
}

/// One hotspot area's burning state.
#[derive(Debug, Clone)]
struct HotspotFire {
    area: HotspotArea,
    geo: GeoPhysField,
    /// All spots ever ignited in this area and not yet burnt out. The
    /// trailing `front_len` entries are the current propagation front.
    spots: Vec<FireSpot>,
    front_len: usize,
    ignited: bool,
}

/// The complete fire state of a scenario.
#[derive(Debug, Clone)]
pub struct FireField {
    world_size: u32,
    params: FireModelParams,
    areas: Vec<HotspotFire>,
}

impl FireField {
    /// Build the field and generate each area's geo-physical raster.
    ///
    /// No area is ignited yet; call [`FireField::ignite_due`] as ticks
    /// elapse so delayed areas light up on schedule.
    pub fn new(
        world_size: u32,
        params: FireModelParams,
        hotspots: &[HotspotArea],
        rng: &mut SimRng,
    ) -> Self {
        let areas = hotspots
            .iter()
            .map(|area| HotspotFire {
                geo: GeoPhysField::generate(
                    world_size,
                    area.fuel_coeff,
                    area.wind_speed,
                    area.wind_direction_rad(),
                    rng,
                ),
                area: area.clone(),
                spots: Vec::new(),
                front_len: 0,
                ignited: false,
            })
            .collect();
        Self {
            world_size,
            params,
            areas,
        }
    }

    /// Ignite every area whose delay has elapsed by `tick`.
    ///
    /// Returns the newly ignited spots so the caller can merge them into
    /// its tracking sets.
    pub fn ignite_due(&mut self, tick: u32, rng: &mut SimRng) -> Vec<FireSpot> {
        let mut ignited = Vec::new();
        for area in &mut self.areas {
            if area.ignited || area.area.ignition_delay > tick {
                continue;
            }
            let spots = hotspot_init(&self.params, &area.area, tick, rng);
            debug!(
                "igniting hotspot area with {} spots at tick {}",
                spots.len(),
                tick
            );
            area.front_len = spots.len();
            area.spots = spots.clone();
            area.ignited = true;
            ignited.extend(spots);
        }
        ignited
    }

    /// Advance every active front one tick.
    ///
    /// Spots on extinguished cells stay fixed; spots that drifted outside
    /// the world stop contributing and are dropped from the front. Returns
    /// the merged new front across all areas for list bookkeeping.
    pub fn propagate(
        &mut self,
        tick: u32,
        pruned: &FxHashSet<CellCoord>,
        rng: &mut SimRng,
    ) -> Vec<FireSpot> {
        let limit = (self.world_size - 1) as f32;
        let mut merged = Vec::new();
        for area in &mut self.areas {
            if !area.ignited || area.spots.is_empty() {
                continue;
            }
            let front_start = area.spots.len() - area.front_len;
            let mut new_front = Vec::with_capacity(area.front_len);
            for i in front_start..area.spots.len() {
                let spot = area.spots[i];
                if spot.x <= 0.0 || spot.y <= 0.0 || spot.x > limit || spot.y > limit {
                    continue;
                }

                let r = area.geo.spread_rate_at(spot.x, spot.y);
                let (u, theta) = area.geo.sample_wind(rng);
                let (dx, dy) = spread_step(r, u, theta);

                // Extinguished cells no longer carry the front forward.
                let (x_new, y_new) = if pruned.contains(&spot.cell()) {
                    (spot.x, spot.y)
                } else {
                    (
                        spot.x + dx * self.params.time_step,
                        spot.y + dy * self.params.time_step,
                    )
                };

                let front = &area.spots[front_start..];
                let intensity = fire_intensity(&self.params, spot.x, spot.y, front, rng)
                    + fire_intensity(&self.params, spot.x, spot.y, &area.spots, rng);
                let intensity = if intensity.is_finite() {
                    intensity.max(0.0)
                } else {
                    0.0
                };
                debug_assert!(intensity.is_finite() && intensity >= 0.0);

                new_front.push(FireSpot {
                    x: x_new,
                    y: y_new,
                    intensity,
                    ignition_tick: tick,
                });
            }
            area.spots.extend_from_slice(&new_front);
            area.front_len = new_front.len();
            merged.extend(new_front);
        }
        merged
    }

    /// Exponential fuel-exhaustion decay of every active spot.
    ///
    /// `I_new = I * exp(-decay_rate * age / R)` with the local spread rate
    /// `R` as the fuel reservoir proxy.
    pub fn decay(&mut self, tick: u32) {
        let decay_rate = self.params.decay_rate;
        let time_step = self.params.time_step;
        for area in &mut self.areas {
            for spot in &mut area.spots {
                let age = (tick.saturating_sub(spot.ignition_tick) + 1) as f32 * time_step;
                let r = area.geo.spread_rate_at(spot.x, spot.y);
                spot.intensity *= (-decay_rate * age / r).exp();
                if !spot.intensity.is_finite() {
                    spot.intensity = 0.0;
                }
            }
        }
    }

    /// Remove spots whose intensity dropped below the weak-fire threshold.
    ///
    /// Returns the removed spots as burnt-out fires, distinct from
    /// agent-suppressed cells. Idempotent until the next decay step.
    pub fn prune(&mut self) -> Vec<FireSpot> {
        let threshold = self.params.weak_fire_threshold;
        let mut burnt_out = Vec::new();
        for area in &mut self.areas {
            let front_start = area.spots.len() - area.front_len;
            let mut kept = Vec::with_capacity(area.spots.len());
            let mut kept_front = 0;
            for (i, spot) in area.spots.iter().enumerate() {
                if spot.intensity < threshold {
                    burnt_out.push(*spot);
                } else {
                    if i >= front_start {
                        kept_front += 1;
                    }
                    kept.push(*spot);
                }
            }
            area.spots = kept;
            area.front_len = kept_front;
        }
        burnt_out
    }

    /// Decay then prune, as one fire-bookkeeping step.
    pub fn decay_and_prune(&mut self, tick: u32) -> Vec<FireSpot> {
        self.decay(tick);
        self.prune()
    }

    /// All active (not burnt-out, not yet dropped) spots across areas.
    pub fn active_spots(&self) -> impl Iterator<Item = &FireSpot> {
        self.areas.iter().flat_map(|area| area.spots.iter())
    }

    /// Number of active spots.
    #[must_use]
    pub fn spot_count(&self) -> usize {
        self.areas.iter().map(|area| area.spots.len()).sum()
    }

    /// Geo-physical raster of one hotspot area.
    #[must_use]
    pub fn geo(&self, area_index: usize) -> &GeoPhysField {
        &self.areas[area_index].geo
    }

    #[must_use]
    pub fn world_size(&self) -> u32 {
        self.world_size
    }

    #[must_use]
    pub fn params(&self) -> &FireModelParams {
        &self.params
    }
}

/// Sample an area's ignition points and their initial intensities.
fn hotspot_init(
    params: &FireModelParams,
    area: &HotspotArea,
    tick: u32,
    rng: &mut SimRng,
) -> Vec<FireSpot> {
    let mut positions = Vec::with_capacity(area.num_ignition_points as usize);
    for _ in 0..area.num_ignition_points {
        let x = rng.uniform_i32(area.x_min, area.x_max) as f32;
        let y = rng.uniform_i32(area.y_min, area.y_max) as f32;
        positions.push(FireSpot {
            x,
            y,
            intensity: 0.0,
            ignition_tick: tick,
        });
    }
    let sources = positions.clone();
    for spot in &mut positions {
        spot.intensity = fire_intensity(params, spot.x, spot.y, &sources, rng).max(0.0);
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_params() -> FireModelParams {
        FireModelParams::default()
    }

    fn single_area(world_size: u32, points: u32) -> (FireField, SimRng) {
        let mut rng = SimRng::seed_from_u64(11);
        let area = HotspotArea::around((50, 50), 5, points, 10.0, 5.0, 45.0);
        let field = FireField::new(world_size, test_params(), &[area], &mut rng);
        (field, rng)
    }

    #[test]
    fn test_spread_step_is_zero_in_calm_air() {
        // At U = 0 the length-to-breadth ratio collapses to 1 and the
        // ellipse degenerates to a circle with (nearly) no net advance;
        // rounding in the LB constants leaves a sub-centimeter residue.
        let (dx, dy) = spread_step(5.0, 0.0, 1.0);
        assert!(dx.abs() < 1e-2, "dx = {dx}");
        assert!(dy.abs() < 1e-2, "dy = {dy}");
    }

    #[test]
    fn test_spread_step_follows_wind_azimuth() {
        let theta = std::f32::consts::FRAC_PI_4;
        let (dx, dy) = spread_step(5.0, 5.0, theta);
        assert!(dx > 0.0 && dy > 0.0);
        // sin(45°) == cos(45°), so both components match.
        assert!((dx - dy).abs() < 1e-5);
    }

    #[test]
    fn test_spread_step_survives_low_wind_domain() {
        // |LB| < 1 never actually happens for U >= 0, but negative gust
        // samples can reach it; the guard must keep the result finite.
        for u in [-5.0, -1.0, -0.5, 0.0, 0.1] {
            let (dx, dy) = spread_step(3.0, u, 0.7);
            assert!(dx.is_finite() && dy.is_finite(), "u = {u}");
        }
    }

    #[test]
    fn test_hotspot_init_samples_inside_box() {
        let (mut field, mut rng) = single_area(100, 8);
        let spots = field.ignite_due(0, &mut rng);
        assert_eq!(spots.len(), 8);
        for spot in &spots {
            assert!((45.0..55.0).contains(&spot.x), "x = {}", spot.x);
            assert!((45.0..55.0).contains(&spot.y), "y = {}", spot.y);
            assert!(spot.intensity.is_finite() && spot.intensity >= 0.0);
        }
    }

    #[test]
    fn test_delayed_area_waits_for_its_tick() {
        let mut rng = SimRng::seed_from_u64(21);
        let mut area = HotspotArea::around((30, 30), 5, 4, 10.0, 5.0, 90.0);
        area.ignition_delay = 10;
        let mut field = FireField::new(100, test_params(), &[area], &mut rng);

        assert!(field.ignite_due(0, &mut rng).is_empty());
        assert!(field.ignite_due(9, &mut rng).is_empty());
        assert_eq!(field.ignite_due(10, &mut rng).len(), 4);
        // Already ignited; nothing new on later ticks.
        assert!(field.ignite_due(11, &mut rng).is_empty());
    }

    #[test]
    fn test_propagation_keeps_intensity_finite() {
        let (mut field, mut rng) = single_area(100, 5);
        field.ignite_due(0, &mut rng);
        let pruned = FxHashSet::default();
        for tick in 1..=50 {
            let front = field.propagate(tick, &pruned, &mut rng);
            for spot in &front {
                assert!(
                    spot.intensity.is_finite() && spot.intensity >= 0.0,
                    "tick {tick}: intensity {}",
                    spot.intensity
                );
            }
        }
    }

    #[test]
    fn test_pruned_cells_stay_fixed() {
        let (mut field, mut rng) = single_area(100, 5);
        let spots = field.ignite_due(0, &mut rng);

        let mut pruned = FxHashSet::default();
        for spot in &spots {
            pruned.insert(spot.cell());
        }
        let front = field.propagate(1, &pruned, &mut rng);
        for (before, after) in spots.iter().zip(front.iter()) {
            assert_eq!(before.x, after.x);
            assert_eq!(before.y, after.y);
        }
    }

    #[test]
    fn test_out_of_world_spots_drop_from_front() {
        let mut rng = SimRng::seed_from_u64(33);
        // Box straddling the origin: a good share of the ignition points
        // land at x <= 0 or y <= 0 and must not propagate.
        let area = HotspotArea::around((0, 0), 3, 40, 10.0, 5.0, 45.0);
        let mut field = FireField::new(100, test_params(), &[area], &mut rng);
        let ignited = field.ignite_due(0, &mut rng);

        let in_bounds = ignited
            .iter()
            .filter(|s| s.x > 0.0 && s.y > 0.0 && s.x <= 99.0 && s.y <= 99.0)
            .count();
        assert!(in_bounds < ignited.len(), "seed must place some outside");

        let pruned = FxHashSet::default();
        let front = field.propagate(1, &pruned, &mut rng);
        assert_eq!(front.len(), in_bounds);
    }

    #[test]
    fn test_decay_reduces_intensity() {
        let (mut field, mut rng) = single_area(100, 5);
        field.ignite_due(0, &mut rng);
        let before: Vec<f32> = field.active_spots().map(|s| s.intensity).collect();
        field.decay(0);
        for (b, spot) in before.iter().zip(field.active_spots()) {
            assert!(spot.intensity <= *b);
        }
    }

    #[test]
    fn test_prune_is_idempotent() {
        let (mut field, mut rng) = single_area(100, 10);
        field.ignite_due(0, &mut rng);
        // Age the fire until some spots are weak.
        for tick in 0..5 {
            field.decay(tick);
        }
        let first = field.prune();
        let survivors: Vec<FireSpot> = field.active_spots().copied().collect();
        let second = field.prune();
        assert!(second.is_empty(), "second prune removed {} spots", second.len());
        let after: Vec<FireSpot> = field.active_spots().copied().collect();
        assert_eq!(survivors, after);
        for spot in &first {
            assert!(spot.intensity < field.params().weak_fire_threshold);
        }
    }

    #[test]
    fn test_flame_length_grows_with_intensity() {
        let weak = FireSpot {
            x: 0.0,
            y: 0.0,
            intensity: 10.0,
            ignition_tick: 0,
        };
        let strong = FireSpot {
            intensity: 1000.0,
            ..weak
        };
        assert!(strong.flame_length() > weak.flame_length());
    }
}

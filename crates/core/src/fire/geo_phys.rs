//! Geo-physical terrain information.
//!
//! A per-cell spread-rate raster plus per-row wind samples, generated once
//! per scenario from the hotspot area's averages and consumed read-only by
//! propagation.

use crate::core_types::SimRng;

/// Lower bound of the spread-rate raster; keeps the decay divisor nonzero.
const MIN_FUEL_COEFF: f32 = 1e-15;

/// Wind sample scatter around the scenario averages.
const WIND_STD_DEV: f32 = 2.0;

/// Read-only geo-physical raster for one hotspot area.
#[derive(Debug, Clone)]
pub struct GeoPhysField {
    size: u32,
    /// Row-major `size * size` spread-rate raster.
    spread_rate: Vec<f32>,
    /// One wind-speed sample per row.
    wind_speed: Vec<f32>,
    /// One wind-azimuth sample per row, radians.
    wind_direction: Vec<f32>,
}

impl GeoPhysField {
    /// Generate the raster and wind rows for a terrain of `size * size`.
    ///
    /// Spread rates are uniform in `[MIN_FUEL_COEFF, max_fuel_coeff]`; wind
    /// speed and direction are Gaussian around the given averages.
    pub fn generate(
        size: u32,
        max_fuel_coeff: f32,
        avg_wind_speed: f32,
        avg_wind_direction: f32,
        rng: &mut SimRng,
    ) -> Self {
        let cells = (size as usize) * (size as usize);
        let mut spread_rate = Vec::with_capacity(cells);
        for _ in 0..cells {
            spread_rate.push(rng.uniform(MIN_FUEL_COEFF, max_fuel_coeff));
        }

        let rows = size as usize;
        let mut wind_speed = Vec::with_capacity(rows);
        let mut wind_direction = Vec::with_capacity(rows);
        for _ in 0..rows {
            wind_speed.push(rng.normal(avg_wind_speed, WIND_STD_DEV));
        }
        for _ in 0..rows {
            wind_direction.push(rng.normal(avg_wind_direction, WIND_STD_DEV));
        }

        Self {
            size,
            spread_rate,
            wind_speed,
            wind_direction,
        }
    }

    /// Terrain side length.
    #[must_use]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Local spread rate at a continuous position, rounded to the nearest
    /// raster cell and clamped to the terrain.
    #[must_use]
    pub fn spread_rate_at(&self, x: f32, y: f32) -> f32 {
        let limit = i64::from(self.size) - 1;
        let ix = (x.round() as i64).clamp(0, limit) as usize;
        let iy = (y.round() as i64).clamp(0, limit) as usize;
        self.spread_rate[ix * self.size as usize + iy]
    }

    /// Draw a wind (speed, direction) pair from a uniformly random row.
    pub fn sample_wind(&self, rng: &mut SimRng) -> (f32, f32) {
        let speed = self.wind_speed[rng.index(self.wind_speed.len())];
        let direction = self.wind_direction[rng.index(self.wind_direction.len())];
        (speed, direction)
    }
}

//! Stochastic fire-field model.
//!
//! Ignition, intensity, propagation, decay and pruning of fire spots over a
//! geo-physical raster. Propagation follows a simplified closed-form FARSITE
//! variant: each spot advances along an elliptical growth axis whose length
//! depends on the local spread rate and the sampled wind.

pub mod field;
pub mod geo_phys;
pub mod tracking;

pub use field::{FireField, FireSpot};
pub use geo_phys::GeoPhysField;
pub use tracking::FireTracker;

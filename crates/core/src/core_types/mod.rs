//! Core types and utilities

pub mod cell;
pub mod rng;
pub mod vec3;

pub use cell::CellCoord;
pub use rng::SimRng;
pub use vec3::Vec3;

//! Field-of-view sensing and suppression.

pub mod fov;
pub mod sense;
pub mod suppress;

pub use fov::FovRect;
pub use sense::sense;
pub use suppress::{suppress, SuppressionOutcome};

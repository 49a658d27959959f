//! Read entities definitions.

pub mod allocation;
pub mod locator;
pub mod occupancy;

pub use self::{locator::Index, occupancy::Occupancy};

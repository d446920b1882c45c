//! Host-side collaborators: container mounting, input translation and a
//! virtual frame clock for headless runs.

pub mod clock;
pub mod container;
pub mod input;

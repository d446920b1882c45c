pub mod animation;
pub mod lifecycle;
pub mod schedule;

//! Top-down touch shooter: pooled entity simulation, enemy AI, circle
//! collisions and a flat-shape renderer.

pub mod compute;
pub mod config;
pub mod entities;
pub mod factory;
pub mod input;
pub mod pool;
pub mod render;

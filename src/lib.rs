//! `lumen`: an offline, physically-based Monte Carlo path tracer. A tiled
//! work-stealing render pool walks a thin-lens camera's rays through a
//! closed set of shape/material primitives, accumulating a per-pixel
//! running mean over bounded-depth paths (no Russian roulette).

#[macro_use]
pub mod macros;

pub mod camera;
pub mod film;
pub mod integrators;
pub mod interaction;
pub mod materials;
pub mod math;
pub mod ray;
pub mod renderer;
pub mod sampling;
pub mod scene;
pub mod shapes;

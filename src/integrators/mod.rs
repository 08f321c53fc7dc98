//! The path-tracing integrator (§4.4). A single integrator type: the spec
//! names bidirectional/Metropolis/adaptive variants as explicit non-goals,
//! so there's no `IntegratorType` enum to dispatch over here.

pub mod path;

pub use path::radiance;

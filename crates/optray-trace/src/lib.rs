#![warn(missing_docs)]

//! Recursive optical ray-path tracing for optray.
//!
//! This crate implements the core reflect/refract traversal: given a scene
//! of optically-tagged surfaces and an initial ray, it follows the ray
//! through mirror reflections and Snell refractions, branching where a
//! surface is both reflective and refractive, and records the polyline
//! path each top-level ray traverses.
//!
//! Geometry evaluation is injected, not owned: the tracer consults a
//! [`SceneOracle`] for intersections, materials, and surface normals, so
//! it runs against any back end, whether the analytic scenes of
//! `optray-scene` or a synthetic oracle in a test.
//!
//! # Architecture
//!
//! - [`Ray`] / [`RayHit`] - ray representation and intersection results
//! - [`SceneOracle`] - the consumed collaborator interface
//! - [`Tracer`] - recursive reflect/refract traversal with depth limiting
//! - [`TracePath`] - the recorded polyline plus terminal reasons
//!
//! # Example
//!
//! ```ignore
//! use optray_trace::{TraceConfig, Tracer};
//! use optray_scene::Scene;
//!
//! let mut scene = Scene::new();
//! // ... add surfaces and materials ...
//! let tracer = Tracer::new(&scene, TraceConfig::new(4))?;
//! let path = tracer.trace(Point3::origin(), Vec3::z())?;
//! for p in path.points() {
//!     println!("{p}");
//! }
//! ```

mod error;
mod ray;
pub mod oracle;
pub mod path;
pub mod tracer;

pub use error::{Result, TraceError};
pub use oracle::{Material, SceneOracle, SurfaceId};
pub use path::{TerminalReason, TracePath, TraceSegment};
pub use ray::{Ray, RayHit};
pub use tracer::{TraceConfig, TraceState, Tracer};

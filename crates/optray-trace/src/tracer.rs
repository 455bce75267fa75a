//! Recursive reflect/refract traversal.
//!
//! Each invocation of the tracer handles one ray: it asks the oracle for
//! the nearest hit, records the traversed segment, then branches into a
//! mirror reflection and/or a Snell refraction depending on the hit
//! material. Both branches may fire for the same hit, producing two
//! divergent sub-traces in one path.
//!
//! Depth accounting follows the original design: `hits_done` is compared
//! against `max_depth` as each branch's precondition but is not advanced
//! by either branch. Callers may pre-seed it through
//! [`TraceState::with_hits_done`]. Guaranteed termination comes from the
//! hard recursion ceiling and the per-ray node budget, both reported as
//! distinct terminal reasons.

use crate::error::{Result, TraceError};
use crate::oracle::{SceneOracle, SurfaceId};
use crate::path::{TerminalReason, TracePath};
use crate::ray::Ray;
use optray_math::{reflect, refract, Dir3, Point2, Point3, Vec3};

/// Offset applied along a reflected direction to move the child ray's
/// origin off the surface it just hit.
pub const RAY_OFFSET_EPSILON: f64 = 1e-6;

/// Margin kept between a jittered surface parameter and its domain
/// boundary, in normalized parameter units.
pub const PARAM_JITTER_EPSILON: f64 = 1e-4;

/// Length of the marker segment emitted when a ray escapes the scene.
pub const ESCAPE_MARKER_LENGTH: f64 = 1.0;

/// Hard ceiling on recursion depth, independent of the configured bound.
pub const MAX_RECURSION_DEPTH: usize = 64;

/// Default cap on branch invocations per top-level ray.
pub const DEFAULT_NODE_BUDGET: usize = 4096;

/// Configuration for a tracer.
#[derive(Debug, Clone, Copy)]
pub struct TraceConfig {
    /// Bounce budget compared against `hits_done` by both branch
    /// preconditions. Clamped to [`MAX_RECURSION_DEPTH`] on tracer
    /// construction.
    pub max_depth: usize,
    /// Index of refraction of the ambient medium.
    pub ambient_index: f64,
    /// Defensive cap on branch invocations per top-level ray.
    pub node_budget: usize,
}

impl TraceConfig {
    /// Configuration with the given depth bound, ambient index 1.0
    /// (vacuum/air), and the default node budget.
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            ambient_index: 1.0,
            node_budget: DEFAULT_NODE_BUDGET,
        }
    }

    /// Set the ambient index of refraction.
    pub fn with_ambient_index(mut self, ambient_index: f64) -> Self {
        self.ambient_index = ambient_index;
        self
    }

    /// Set the per-ray node budget.
    pub fn with_node_budget(mut self, node_budget: usize) -> Self {
        self.node_budget = node_budget;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.max_depth < 1 {
            return Err(TraceError::InvalidMaxDepth(self.max_depth));
        }
        if !(self.ambient_index.is_finite() && self.ambient_index > 0.0) {
            return Err(TraceError::InvalidAmbientIndex(self.ambient_index));
        }
        Ok(())
    }
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self::new(8)
    }
}

/// State threaded by value through one branch of the recursion tree.
///
/// Each recursive call receives a modified copy; branches never share
/// mutable state.
#[derive(Debug, Clone, Copy)]
pub struct TraceState {
    /// Ray traced by this invocation.
    pub current_ray: Ray,
    /// 1-based depth of this invocation in the recursion tree.
    pub recursion_depth: usize,
    /// Index of refraction of the ambient medium.
    pub ambient_index: f64,
    /// Bounce budget (see module docs).
    pub max_depth: usize,
    /// Bounce counter compared against `max_depth` (see module docs).
    pub hits_done: usize,
}

impl TraceState {
    /// Top-level state for `ray` under `config`.
    pub fn new(ray: Ray, config: &TraceConfig) -> Self {
        Self {
            current_ray: ray,
            recursion_depth: 1,
            ambient_index: config.ambient_index,
            max_depth: config.max_depth,
            hits_done: 0,
        }
    }

    /// Pre-seed the bounce counter.
    pub fn with_hits_done(mut self, hits_done: usize) -> Self {
        self.hits_done = hits_done;
        self
    }

    /// Child state continuing along `ray`, one level deeper.
    fn descend(&self, ray: Ray) -> Self {
        Self {
            current_ray: ray,
            recursion_depth: self.recursion_depth + 1,
            ..*self
        }
    }
}

/// Recursive reflect/refract tracer over an injected scene oracle.
///
/// The oracle and materials are read-only for the tracer's lifetime;
/// tracing different top-level rays through the same tracer from
/// multiple threads is safe (see [`Tracer::trace_all`]).
pub struct Tracer<'a, S: SceneOracle> {
    oracle: &'a S,
    config: TraceConfig,
}

impl<'a, S: SceneOracle> Tracer<'a, S> {
    /// Create a tracer, rejecting malformed configuration and empty
    /// scenes before any recursion can begin.
    pub fn new(oracle: &'a S, config: TraceConfig) -> Result<Self> {
        config.validate()?;
        if oracle.is_empty() {
            return Err(TraceError::EmptyScene);
        }
        let config = TraceConfig {
            max_depth: config.max_depth.min(MAX_RECURSION_DEPTH),
            ..config
        };
        Ok(Self { oracle, config })
    }

    /// The configuration in effect, after depth clamping.
    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    /// Trace one top-level ray from `origin` along `direction`.
    ///
    /// The direction need not be normalized; a direction too short to
    /// normalize rejects the request.
    pub fn trace(&self, origin: Point3, direction: Vec3) -> Result<TracePath> {
        let ray = Ray::new(origin, direction).ok_or(TraceError::DegenerateDirection)?;
        Ok(self.trace_state(TraceState::new(ray, &self.config)))
    }

    /// Trace from an explicit state, e.g. with a pre-seeded bounce
    /// counter.
    pub fn trace_state(&self, state: TraceState) -> TracePath {
        let mut path = TracePath::default();
        let mut nodes_used = 0usize;
        self.trace_branch(state, &mut path, &mut nodes_used);
        path
    }

    /// Trace many top-level rays, one parallel task per ray.
    pub fn trace_all(&self, rays: &[Ray]) -> Vec<TracePath>
    where
        S: Sync,
    {
        use rayon::prelude::*;
        rays.par_iter()
            .map(|&ray| self.trace_state(TraceState::new(ray, &self.config)))
            .collect()
    }

    fn trace_branch(&self, state: TraceState, path: &mut TracePath, nodes_used: &mut usize) {
        *nodes_used += 1;
        if *nodes_used > self.config.node_budget {
            log::warn!(
                "per-ray node budget of {} exhausted, terminating branch",
                self.config.node_budget
            );
            path.record_terminal(TerminalReason::BudgetExceeded);
            return;
        }

        let ray = state.current_ray;
        let Some(hit) = self.oracle.intersect(&ray) else {
            // Escape marker: one unit along the direction.
            path.record_segment(ray.origin, ray.at(ESCAPE_MARKER_LENGTH));
            path.record_terminal(TerminalReason::Escaped);
            return;
        };

        path.record_segment(ray.origin, hit.point);

        let Some(material) = self.oracle.material_of(hit.surface) else {
            path.record_terminal(TerminalReason::UnconfiguredMaterial);
            return;
        };
        if !material.has_valid_index() {
            path.record_terminal(TerminalReason::UnconfiguredMaterial);
            return;
        }

        if state.hits_done >= state.max_depth {
            path.record_terminal(TerminalReason::DepthExceeded);
            return;
        }
        if state.recursion_depth >= MAX_RECURSION_DEPTH {
            log::debug!(
                "recursion ceiling reached at depth {}",
                state.recursion_depth
            );
            path.record_terminal(TerminalReason::DepthExceeded);
            return;
        }

        let Some(oriented) = self.normal_with_retry(hit.surface, hit.uv) else {
            path.record_terminal(TerminalReason::Absorbed);
            return;
        };

        // Orient the normal against the incoming ray. A back-side hit
        // also swaps the from/to indices: the ray is leaving the solid.
        let incoming = *ray.direction.as_ref();
        let mut normal = *oriented.as_ref();
        let mut n_from = state.ambient_index;
        let mut n_to = material.index_of_refraction;
        if normal.dot(&incoming) > 0.0 {
            std::mem::swap(&mut n_from, &mut n_to);
            normal = -normal;
        }

        let mut continued = false;

        if material.reflective {
            let reflected = Dir3::new_normalize(reflect(incoming, normal));
            // Step off the surface so the child cannot re-hit it at t=0.
            let child_origin = hit.point + RAY_OFFSET_EPSILON * reflected.as_ref();
            log::debug!(
                "reflect at ({:.4}, {:.4}, {:.4}), depth {}",
                hit.point.x,
                hit.point.y,
                hit.point.z,
                state.recursion_depth
            );
            let child = state.descend(Ray::from_unit(child_origin, reflected));
            self.trace_branch(child, path, nodes_used);
            continued = true;
        }

        if material.refractive {
            match refract(incoming, normal, n_from / n_to) {
                Some(refracted) => {
                    // The refracted child starts exactly on the surface;
                    // the oracle's exclusion zone prevents the re-hit.
                    let refracted = Dir3::new_normalize(refracted);
                    log::debug!(
                        "refract at ({:.4}, {:.4}, {:.4}), eta {:.4}, depth {}",
                        hit.point.x,
                        hit.point.y,
                        hit.point.z,
                        n_from / n_to,
                        state.recursion_depth
                    );
                    let child = state.descend(Ray::from_unit(hit.point, refracted));
                    self.trace_branch(child, path, nodes_used);
                    continued = true;
                }
                None if !continued => {
                    log::debug!(
                        "total internal reflection at ({:.4}, {:.4}, {:.4})",
                        hit.point.x,
                        hit.point.y,
                        hit.point.z
                    );
                    path.record_terminal(TerminalReason::TotalInternalReflection);
                    return;
                }
                // The reflection branch above is the sole continuation.
                None => {}
            }
        }

        if !continued {
            path.record_terminal(TerminalReason::Absorbed);
        }
    }

    /// Evaluate the surface normal, retrying once with the parameter
    /// pulled off the domain boundary when the evaluation degenerates.
    fn normal_with_retry(&self, surface: SurfaceId, uv: Point2) -> Option<Dir3> {
        if let Some(n) = self.oracle.normal_at(surface, uv) {
            return Some(n);
        }
        let jittered = jitter_uv(uv, self.oracle.domain_of(surface));
        log::debug!(
            "degenerate normal at ({:.6}, {:.6}), retrying at ({:.6}, {:.6})",
            uv.x,
            uv.y,
            jittered.x,
            jittered.y
        );
        self.oracle.normal_at(surface, jittered)
    }
}

/// Pull each parameter component away from its domain boundary.
fn jitter_uv(uv: Point2, ((u0, u1), (v0, v1)): ((f64, f64), (f64, f64))) -> Point2 {
    Point2::new(jitter_param(uv.x, u0, u1), jitter_param(uv.y, v0, v1))
}

fn jitter_param(t: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if span <= 0.0 {
        return t;
    }
    let normalized = ((t - min) / span).clamp(PARAM_JITTER_EPSILON, 1.0 - PARAM_JITTER_EPSILON);
    min + normalized * span
}

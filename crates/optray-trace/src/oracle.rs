//! Collaborator interfaces consumed by the tracer.
//!
//! The tracer does not own geometry. Intersection, material lookup, and
//! normal evaluation are all provided by an implementation of
//! [`SceneOracle`], injected at construction. This keeps the traversal
//! logic independent of any particular geometry back end and testable
//! against synthetic scenes.

use crate::ray::{Ray, RayHit};
use optray_math::{Dir3, Point2};

slotmap::new_key_type! {
    /// Opaque identity of a surface within a scene.
    ///
    /// Minted by the scene back end; the tracer only passes it back to
    /// the oracle for material and normal lookups.
    pub struct SurfaceId;
}

/// Optical properties of the solid owning a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Index of refraction of the solid's medium.
    pub index_of_refraction: f64,
    /// Whether rays mirror-reflect off this surface.
    pub reflective: bool,
    /// Whether rays refract through this surface.
    pub refractive: bool,
}

impl Material {
    /// A perfect mirror in the ambient medium.
    pub fn mirror() -> Self {
        Self {
            index_of_refraction: 1.0,
            reflective: true,
            refractive: false,
        }
    }

    /// A purely refractive (glass-like) medium with the given index.
    pub fn glass(index_of_refraction: f64) -> Self {
        Self {
            index_of_refraction,
            reflective: false,
            refractive: true,
        }
    }

    /// A surface that neither reflects nor refracts.
    pub fn matte() -> Self {
        Self {
            index_of_refraction: 1.0,
            reflective: false,
            refractive: false,
        }
    }

    /// Mark this material reflective as well.
    pub fn with_reflection(mut self) -> Self {
        self.reflective = true;
        self
    }

    /// Whether the index of refraction is usable for optics.
    ///
    /// A non-finite or non-positive index means the optics of a hit
    /// cannot be determined and the trace branch stops there.
    pub fn has_valid_index(&self) -> bool {
        self.index_of_refraction.is_finite() && self.index_of_refraction > 0.0
    }
}

/// Scene evaluation services consumed by the tracer.
///
/// Implementations must be consistent: `material_of`, `normal_at`, and
/// `domain_of` are queried with surface identities previously returned
/// by `intersect` on the same scene. The scene is never mutated through
/// this trait, so read-only sharing across threads is expected.
pub trait SceneOracle {
    /// Number of surfaces participating in the scene.
    fn surface_count(&self) -> usize;

    /// Nearest forward intersection of `ray` with the scene.
    ///
    /// Must exclude hits within a tolerance-based exclusion zone around
    /// `ray.origin`, so a ray starting on a surface does not immediately
    /// re-intersect it. Returns `None` when nothing is struck.
    fn intersect(&self, ray: &Ray) -> Option<RayHit>;

    /// Optical material assigned to `surface`, if any.
    fn material_of(&self, surface: SurfaceId) -> Option<Material>;

    /// Surface normal at parameter `uv`.
    ///
    /// `None` at parametric singularities; the tracer retries once with
    /// a jittered parameter.
    fn normal_at(&self, surface: SurfaceId, uv: Point2) -> Option<Dir3>;

    /// Parameter domain of `surface` as `((u_min, u_max), (v_min, v_max))`.
    fn domain_of(&self, surface: SurfaceId) -> ((f64, f64), (f64, f64));

    /// True when the scene has no surfaces at all.
    fn is_empty(&self) -> bool {
        self.surface_count() == 0
    }
}

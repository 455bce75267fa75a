//! On-disk scene and result documents.
//!
//! The wire format uses plain `[f64; 3]` arrays so scene files stay
//! hand-editable and independent of the math types used internally.

use anyhow::{bail, Result};
use optray_geom::{CylinderSurface, Plane, SphereSurface};
use optray_math::{Point3, Vec3};
use optray_scene::Scene;
use optray_trace::{Material, Ray, TraceConfig, TracePath};
use serde::{Deserialize, Serialize};

fn default_max_depth() -> usize {
    8
}

fn default_ambient_index() -> f64 {
    1.0
}

/// A scene file: trace settings, surfaces, and the rays to probe with.
#[derive(Debug, Serialize, Deserialize)]
pub struct SceneDoc {
    /// Bounce budget per top-level ray.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Index of refraction of the ambient medium.
    #[serde(default = "default_ambient_index")]
    pub ambient_index: f64,
    /// Surfaces participating in the scene.
    pub surfaces: Vec<SurfaceDoc>,
    /// Top-level rays to trace.
    pub rays: Vec<RayDoc>,
}

/// One surface entry in a scene file.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SurfaceDoc {
    /// Infinite plane given by a point and its normal.
    Plane {
        /// A point on the plane.
        origin: [f64; 3],
        /// Plane normal (need not be unit length).
        normal: [f64; 3],
        /// Optical assignment; absent means unconfigured.
        material: Option<MaterialDoc>,
    },
    /// Sphere given by center and radius.
    Sphere {
        /// Sphere center.
        center: [f64; 3],
        /// Sphere radius.
        radius: f64,
        /// Optical assignment; absent means unconfigured.
        material: Option<MaterialDoc>,
    },
    /// Infinite cylinder given by a point on the axis, the axis
    /// direction, and the radius.
    Cylinder {
        /// A point on the cylinder axis.
        center: [f64; 3],
        /// Axis direction (need not be unit length).
        axis: [f64; 3],
        /// Cylinder radius.
        radius: f64,
        /// Optical assignment; absent means unconfigured.
        material: Option<MaterialDoc>,
    },
}

/// Optical properties of a surface in a scene file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MaterialDoc {
    /// Index of refraction of the owning solid.
    pub index_of_refraction: f64,
    /// Whether rays mirror-reflect off the surface.
    #[serde(default)]
    pub reflective: bool,
    /// Whether rays refract through the surface.
    #[serde(default)]
    pub refractive: bool,
}

impl From<MaterialDoc> for Material {
    fn from(doc: MaterialDoc) -> Self {
        Material {
            index_of_refraction: doc.index_of_refraction,
            reflective: doc.reflective,
            refractive: doc.refractive,
        }
    }
}

/// One top-level ray in a scene file.
#[derive(Debug, Serialize, Deserialize)]
pub struct RayDoc {
    /// Ray origin.
    pub origin: [f64; 3],
    /// Ray direction (need not be unit length).
    pub direction: [f64; 3],
}

/// One traced path in the result document.
#[derive(Debug, Serialize)]
pub struct PathDoc {
    /// Polyline vertices in discovery order.
    pub points: Vec<[f64; 3]>,
    /// Terminal reason tags, one per completed branch.
    pub terminals: Vec<&'static str>,
}

impl SceneDoc {
    /// Parse a scene document from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize this document to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build the scene and trace configuration this document describes.
    pub fn build(&self) -> Result<(Scene, TraceConfig)> {
        let mut scene = Scene::new();
        for surface in &self.surfaces {
            match surface {
                SurfaceDoc::Plane {
                    origin,
                    normal,
                    material,
                } => {
                    let plane = Plane::from_normal(point(*origin), vector(*normal));
                    add(&mut scene, Box::new(plane), *material);
                }
                SurfaceDoc::Sphere {
                    center,
                    radius,
                    material,
                } => {
                    let sphere = SphereSurface::with_center(point(*center), *radius);
                    add(&mut scene, Box::new(sphere), *material);
                }
                SurfaceDoc::Cylinder {
                    center,
                    axis,
                    radius,
                    material,
                } => {
                    let cylinder =
                        CylinderSurface::with_axis(point(*center), vector(*axis), *radius);
                    add(&mut scene, Box::new(cylinder), *material);
                }
            }
        }

        let config = TraceConfig::new(self.max_depth).with_ambient_index(self.ambient_index);
        Ok((scene, config))
    }

    /// Build the top-level rays this document describes.
    pub fn build_rays(&self) -> Result<Vec<Ray>> {
        let mut rays = Vec::with_capacity(self.rays.len());
        for (i, doc) in self.rays.iter().enumerate() {
            let Some(ray) = Ray::new(point(doc.origin), vector(doc.direction)) else {
                bail!("ray {i} has a degenerate direction {:?}", doc.direction);
            };
            rays.push(ray);
        }
        Ok(rays)
    }
}

impl PathDoc {
    /// Convert a traced path into its output form.
    pub fn from_path(path: &TracePath) -> Self {
        Self {
            points: path.points().iter().map(|p| [p.x, p.y, p.z]).collect(),
            terminals: path.terminals().iter().map(|t| t.as_str()).collect(),
        }
    }
}

/// A starter scene: one mirror plane, one glass sphere, one probe ray.
pub fn template() -> SceneDoc {
    SceneDoc {
        max_depth: 8,
        ambient_index: 1.0,
        surfaces: vec![
            SurfaceDoc::Plane {
                origin: [0.0, 0.0, 10.0],
                normal: [0.0, 0.0, -1.0],
                material: Some(MaterialDoc {
                    index_of_refraction: 1.0,
                    reflective: true,
                    refractive: false,
                }),
            },
            SurfaceDoc::Sphere {
                center: [0.0, 0.0, 5.0],
                radius: 1.5,
                material: Some(MaterialDoc {
                    index_of_refraction: 1.5,
                    reflective: false,
                    refractive: true,
                }),
            },
        ],
        rays: vec![RayDoc {
            origin: [0.2, 0.0, 0.0],
            direction: [0.0, 0.0, 1.0],
        }],
    }
}

fn point(p: [f64; 3]) -> Point3 {
    Point3::new(p[0], p[1], p[2])
}

fn vector(v: [f64; 3]) -> Vec3 {
    Vec3::new(v[0], v[1], v[2])
}

fn add(scene: &mut Scene, surface: Box<dyn optray_geom::Surface>, material: Option<MaterialDoc>) {
    match material {
        Some(m) => {
            scene.add_surface(surface, m.into());
        }
        None => {
            scene.add_unassigned(surface);
        }
    }
}

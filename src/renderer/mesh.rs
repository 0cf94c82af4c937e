//! Procedural mesh building
//!
//! Meshes are plain triangle lists with position + normal, built once in
//! local space and stamped into the frame's vertex list with a model matrix.

use std::f32::consts::TAU;

use glam::{Mat3, Mat4, Vec3};

use super::vertex::SceneVertex;

/// Local-space vertex with position and normal
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MeshVertex {
    pub position: Vec3,
    pub normal: Vec3,
}

/// Surface appearance for one stamped mesh
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Material {
    pub color: [f32; 3],
    pub opacity: f32,
    pub emissive: [f32; 3],
}

impl Material {
    pub const fn solid(color: [f32; 3]) -> Self {
        Self {
            color,
            opacity: 1.0,
            emissive: [0.0; 3],
        }
    }

    pub const fn translucent(color: [f32; 3], opacity: f32) -> Self {
        Self {
            color,
            opacity,
            emissive: [0.0; 3],
        }
    }

    /// Glow added on top of lighting, scaled by `intensity`
    pub fn with_emissive(mut self, emissive: [f32; 3], intensity: f32) -> Self {
        self.emissive = emissive.map(|c| c * intensity);
        self
    }
}

/// Built mesh data, reusable across frames
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Append this mesh transformed by `model` to a frame vertex list
    pub fn emit(&self, out: &mut Vec<SceneVertex>, model: Mat4, material: &Material) {
        let normal_matrix = Mat3::from_mat4(model).inverse().transpose();
        let color = [
            material.color[0],
            material.color[1],
            material.color[2],
            material.opacity,
        ];
        let emissive = [
            material.emissive[0],
            material.emissive[1],
            material.emissive[2],
            0.0,
        ];

        out.extend(self.vertices.iter().map(|v| SceneVertex {
            position: model.transform_point3(v.position).into(),
            normal: (normal_matrix * v.normal).normalize_or_zero().into(),
            color,
            emissive,
        }));
    }
}

/// Fluent mesh builder for procedural geometry. Y is up.
#[derive(Default)]
pub struct MeshBuilder {
    vertices: Vec<MeshVertex>,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a triangle with a flat normal (counter-clockwise front face)
    pub fn add_triangle(&mut self, p1: Vec3, p2: Vec3, p3: Vec3) -> &mut Self {
        let normal = (p2 - p1).cross(p3 - p1).normalize_or_zero();
        for position in [p1, p2, p3] {
            self.vertices.push(MeshVertex { position, normal });
        }
        self
    }

    /// Add a triangle with per-vertex normals
    pub fn add_smooth_triangle(&mut self, p: [Vec3; 3], n: [Vec3; 3]) -> &mut Self {
        for i in 0..3 {
            self.vertices.push(MeshVertex {
                position: p[i],
                normal: n[i],
            });
        }
        self
    }

    /// Add a quad (two triangles), corners counter-clockwise
    pub fn add_quad(&mut self, p1: Vec3, p2: Vec3, p3: Vec3, p4: Vec3) -> &mut Self {
        self.add_triangle(p1, p2, p3);
        self.add_triangle(p1, p3, p4);
        self
    }

    /// Box centered at origin
    pub fn add_box(&mut self, width: f32, height: f32, depth: f32) -> &mut Self {
        let (x, y, z) = (width / 2.0, height / 2.0, depth / 2.0);
        let v = |sx: f32, sy: f32, sz: f32| Vec3::new(sx * x, sy * y, sz * z);

        // +Z, -Z
        self.add_quad(v(-1., -1., 1.), v(1., -1., 1.), v(1., 1., 1.), v(-1., 1., 1.));
        self.add_quad(v(1., -1., -1.), v(-1., -1., -1.), v(-1., 1., -1.), v(1., 1., -1.));
        // +Y, -Y
        self.add_quad(v(-1., 1., 1.), v(1., 1., 1.), v(1., 1., -1.), v(-1., 1., -1.));
        self.add_quad(v(-1., -1., -1.), v(1., -1., -1.), v(1., -1., 1.), v(-1., -1., 1.));
        // +X, -X
        self.add_quad(v(1., -1., 1.), v(1., -1., -1.), v(1., 1., -1.), v(1., 1., 1.));
        self.add_quad(v(-1., -1., -1.), v(-1., -1., 1.), v(-1., 1., 1.), v(-1., 1., -1.));
        self
    }

    /// Capped cylinder along Y, centered at origin. A zero top radius makes a cone.
    pub fn add_cylinder(
        &mut self,
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        segments: u32,
    ) -> &mut Self {
        let segments = segments.max(3);
        let half = height / 2.0;
        let top = Vec3::new(0.0, half, 0.0);
        let bottom = Vec3::new(0.0, -half, 0.0);

        for i in 0..segments {
            let a1 = i as f32 / segments as f32 * TAU;
            let a2 = (i + 1) as f32 / segments as f32 * TAU;
            let (s1, c1) = a1.sin_cos();
            let (s2, c2) = a2.sin_cos();

            let b1 = Vec3::new(s1 * radius_bottom, -half, c1 * radius_bottom);
            let b2 = Vec3::new(s2 * radius_bottom, -half, c2 * radius_bottom);
            let t1 = Vec3::new(s1 * radius_top, half, c1 * radius_top);
            let t2 = Vec3::new(s2 * radius_top, half, c2 * radius_top);

            // Side
            if radius_top > 0.0 {
                self.add_quad(b1, b2, t2, t1);
            } else {
                self.add_triangle(b1, b2, top);
            }

            // Caps
            if radius_top > 0.0 {
                self.add_triangle(top, t1, t2);
            }
            if radius_bottom > 0.0 {
                self.add_triangle(bottom, b2, b1);
            }
        }

        self
    }

    /// Cone along Y with its apex at +height/2
    pub fn add_cone(&mut self, radius: f32, height: f32, segments: u32) -> &mut Self {
        self.add_cylinder(0.0, radius, height, segments)
    }

    /// UV sphere with smooth normals
    pub fn add_sphere(&mut self, radius: f32, segments: u32) -> &mut Self {
        let slices = segments.max(3);
        let stacks = (segments / 2).max(2);
        let point = |stack: u32, slice: u32| {
            let theta = stack as f32 / stacks as f32 * std::f32::consts::PI;
            let phi = slice as f32 / slices as f32 * TAU;
            Vec3::new(theta.sin() * phi.sin(), theta.cos(), theta.sin() * phi.cos())
        };

        for stack in 0..stacks {
            for slice in 0..slices {
                let n1 = point(stack, slice);
                let n2 = point(stack + 1, slice);
                let n3 = point(stack + 1, slice + 1);
                let n4 = point(stack, slice + 1);

                if stack != 0 {
                    self.add_smooth_triangle([n1 * radius, n2 * radius, n4 * radius], [n1, n2, n4]);
                }
                if stack != stacks - 1 {
                    self.add_smooth_triangle([n4 * radius, n2 * radius, n3 * radius], [n4, n2, n3]);
                }
            }
        }

        self
    }

    /// Octahedron (diamond) with vertices on the axes
    pub fn add_octahedron(&mut self, radius: f32) -> &mut Self {
        let top = Vec3::Y * radius;
        let bot = Vec3::NEG_Y * radius;
        let ring = [
            Vec3::X * radius,
            Vec3::NEG_Z * radius,
            Vec3::NEG_X * radius,
            Vec3::Z * radius,
        ];

        for i in 0..4 {
            let a = ring[i];
            let b = ring[(i + 1) % 4];
            self.add_triangle(top, a, b);
            self.add_triangle(bot, b, a);
        }

        self
    }

    /// Flat rectangle on the XZ plane facing +Y
    pub fn add_ground_plane(&mut self, width: f32, depth: f32) -> &mut Self {
        let (x, z) = (width / 2.0, depth / 2.0);
        self.add_quad(
            Vec3::new(-x, 0.0, z),
            Vec3::new(x, 0.0, z),
            Vec3::new(x, 0.0, -z),
            Vec3::new(-x, 0.0, -z),
        )
    }

    /// Upright rectangle on the XY plane facing +Z
    pub fn add_panel(&mut self, width: f32, height: f32) -> &mut Self {
        let (x, y) = (width / 2.0, height / 2.0);
        self.add_quad(
            Vec3::new(-x, -y, 0.0),
            Vec3::new(x, -y, 0.0),
            Vec3::new(x, y, 0.0),
            Vec3::new(-x, y, 0.0),
        )
    }

    /// Build mesh data (consumes builder)
    pub fn finish(self) -> MeshData {
        MeshData {
            vertices: self.vertices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn built(f: impl FnOnce(&mut MeshBuilder)) -> MeshData {
        let mut builder = MeshBuilder::new();
        f(&mut builder);
        builder.finish()
    }

    #[test]
    fn test_box_has_outward_normals() {
        let mesh = built(|b| {
            b.add_box(2.0, 2.0, 2.0);
        });
        assert_eq!(mesh.vertex_count(), 36);
        for v in &mesh.vertices {
            // Each face normal points the same way as its vertices
            assert!(v.normal.dot(v.position) > 0.0);
        }
    }

    #[test]
    fn test_octahedron_outward() {
        let mesh = built(|b| {
            b.add_octahedron(0.2);
        });
        assert_eq!(mesh.vertex_count(), 24);
        for tri in mesh.vertices.chunks(3) {
            let centroid = (tri[0].position + tri[1].position + tri[2].position) / 3.0;
            assert!(tri[0].normal.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn test_cylinder_and_cone_counts() {
        let cyl = built(|b| {
            b.add_cylinder(0.1, 0.1, 0.05, 8);
        });
        // quad side + two caps per segment
        assert_eq!(cyl.vertex_count(), 8 * (6 + 3 + 3));
        let cone = built(|b| {
            b.add_cone(0.8, 1.2, 8);
        });
        assert_eq!(cone.vertex_count(), 8 * (3 + 3));
    }

    #[test]
    fn test_cylinder_side_normals_outward() {
        let mesh = built(|b| {
            b.add_cylinder(1.0, 1.0, 2.0, 12);
        });
        for tri in mesh.vertices.chunks(3) {
            let centroid = (tri[0].position + tri[1].position + tri[2].position) / 3.0;
            assert!(tri[0].normal.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn test_sphere_normals_unit() {
        let mesh = built(|b| {
            b.add_sphere(0.2, 16);
        });
        assert!(mesh.vertex_count() > 0);
        for v in &mesh.vertices {
            assert!((v.normal.length() - 1.0).abs() < 1e-4);
            assert!((v.position.length() - 0.2).abs() < 1e-4);
        }
    }

    #[test]
    fn test_emit_applies_model_and_material() {
        let mesh = built(|b| {
            b.add_ground_plane(2.0, 2.0);
        });
        let mut out = Vec::new();
        let model = Mat4::from_translation(Vec3::new(5.0, 1.0, 0.0));
        let material = Material::translucent([1.0, 0.0, 0.0], 0.5).with_emissive([1.0, 1.0, 1.0], 0.25);

        mesh.emit(&mut out, model, &material);

        assert_eq!(out.len(), 6);
        for v in &out {
            assert_eq!(v.position[1], 1.0);
            assert!(v.position[0] >= 4.0 && v.position[0] <= 6.0);
            assert_eq!(v.normal, [0.0, 1.0, 0.0]);
            assert_eq!(v.color, [1.0, 0.0, 0.0, 0.5]);
            assert_eq!(v.emissive, [0.25, 0.25, 0.25, 0.0]);
        }
    }
}

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use std::sync::LazyLock;

/// Interleaved vertex record: position, then texcoord.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub tex_coord: [f32; 2],
}

/// Unit quad the six cube faces are stamped from.
const QUAD_VERTICES: [Vertex; 4] = [
    Vertex {
        position: [0.5, 0.5, 0.0],
        tex_coord: [1.0, 1.0],
    },
    Vertex {
        position: [0.5, -0.5, 0.0],
        tex_coord: [1.0, 0.0],
    },
    Vertex {
        position: [-0.5, -0.5, 0.0],
        tex_coord: [0.0, 0.0],
    },
    Vertex {
        position: [-0.5, 0.5, 0.0],
        tex_coord: [0.0, 1.0],
    },
];
const QUAD_INDICES: [u16; 6] = [3, 2, 1, 3, 1, 0];

/// World-space positions of the 10 drawn cube instances.
pub const INSTANCE_POSITIONS: [Vec3; 10] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(2.0, 5.0, -15.0),
    Vec3::new(-1.5, -2.2, -2.5),
    Vec3::new(-3.8, -2.0, -12.3),
    Vec3::new(2.4, -0.4, -3.5),
    Vec3::new(-1.7, 3.0, -7.5),
    Vec3::new(1.3, -2.0, -2.5),
    Vec3::new(1.5, 2.0, -2.5),
    Vec3::new(1.5, 0.2, -1.5),
    Vec3::new(-1.3, 1.0, -1.5),
];

/// Immutable cube mesh: 24 vertices, 36 indices.
#[derive(Debug, Clone)]
pub struct CubeMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

/// Built once per process on first use; every consumer shares it.
pub static CUBE: LazyLock<CubeMesh> = LazyLock::new(CubeMesh::build);

impl CubeMesh {
    fn build() -> Self {
        let transforms = face_transforms();
        let mut vertices = Vec::with_capacity(transforms.len() * QUAD_VERTICES.len());
        let mut indices = Vec::with_capacity(transforms.len() * QUAD_INDICES.len());
        for (face, transform) in transforms.iter().enumerate() {
            for quad_vertex in &QUAD_VERTICES {
                let position = transform.transform_point3(Vec3::from_array(quad_vertex.position));
                vertices.push(Vertex {
                    position: position.to_array(),
                    tex_coord: quad_vertex.tex_coord,
                });
            }
            let base = (face * QUAD_VERTICES.len()) as u16;
            indices.extend(QUAD_INDICES.iter().map(|index| index + base));
        }
        Self { vertices, indices }
    }
}

/// One transform per cube face, moving the unit quad into place.
fn face_transforms() -> [Mat4; 6] {
    [
        // front
        Mat4::from_translation(Vec3::new(0.0, 0.0, 0.5)),
        // back
        Mat4::from_translation(Vec3::new(0.0, 0.0, -0.5))
            * Mat4::from_rotation_y(180.0_f32.to_radians()),
        // bottom
        Mat4::from_translation(Vec3::new(0.0, -0.5, 0.0))
            * Mat4::from_rotation_x(90.0_f32.to_radians()),
        // top
        Mat4::from_translation(Vec3::new(0.0, 0.5, 0.0))
            * Mat4::from_rotation_x(-90.0_f32.to_radians()),
        // left
        Mat4::from_translation(Vec3::new(-0.5, 0.0, 0.0))
            * Mat4::from_rotation_y(-90.0_f32.to_radians()),
        // right
        Mat4::from_translation(Vec3::new(0.5, 0.0, 0.0))
            * Mat4::from_rotation_y(90.0_f32.to_radians()),
    ]
}

use bytemuck::{Pod, Zeroable};
use thiserror::Error;

/// Interleaved vertex layout uploaded to the GPU.
///
/// The attribute order matches the shader locations: position (0), normal (1),
/// texcoord (2).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub texcoord: [f32; 2],
}

impl Vertex {
    pub const STRIDE: u64 = std::mem::size_of::<Vertex>() as u64;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
    #[error("{attribute} array has {len} values, expected a multiple of {components}")]
    AttributeLength {
        attribute: &'static str,
        len: usize,
        components: usize,
    },
    #[error("{attribute} describes {found} vertices but position describes {expected}")]
    VertexCountMismatch {
        attribute: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("index count {0} is not a multiple of 3")]
    PartialTriangle(usize),
    #[error("index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u16, vertex_count: usize },
}

/// Indexed triangle mesh with position, normal and texcoord attributes.
///
/// Validated on construction and immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    positions: Vec<f32>,
    normals: Vec<f32>,
    texcoords: Vec<f32>,
    indices: Vec<u16>,
}

impl Mesh {
    /// Builds a mesh from flat attribute arrays.
    pub fn new(
        positions: Vec<f32>,
        normals: Vec<f32>,
        texcoords: Vec<f32>,
        indices: Vec<u16>,
    ) -> Result<Self, MeshError> {
        let vertex_count = attribute_count("position", &positions, 3)?;
        for (attribute, values, components) in
            [("normal", &normals, 3), ("texcoord", &texcoords, 2)]
        {
            let found = attribute_count(attribute, values, components)?;
            if found != vertex_count {
                return Err(MeshError::VertexCountMismatch {
                    attribute,
                    expected: vertex_count,
                    found,
                });
            }
        }
        if indices.len() % 3 != 0 {
            return Err(MeshError::PartialTriangle(indices.len()));
        }
        if let Some(&index) = indices
            .iter()
            .find(|&&index| usize::from(index) >= vertex_count)
        {
            return Err(MeshError::IndexOutOfRange {
                index,
                vertex_count,
            });
        }

        Ok(Self {
            positions,
            normals,
            texcoords,
            indices,
        })
    }

    /// The demo cube: 24 vertices (four per face, faces ordered +X, -X, +Y,
    /// -Y, +Z, -Z) spanning -1..1 on every axis.
    pub fn cube() -> Self {
        Self {
            positions: CUBE_POSITIONS.to_vec(),
            normals: CUBE_NORMALS.to_vec(),
            texcoords: CUBE_TEXCOORDS.to_vec(),
            indices: CUBE_INDICES.to_vec(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn normals(&self) -> &[f32] {
        &self.normals
    }

    pub fn texcoords(&self) -> &[f32] {
        &self.texcoords
    }

    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    /// Interleaves the attribute arrays into GPU vertices.
    pub fn vertices(&self) -> Vec<Vertex> {
        self.positions
            .chunks_exact(3)
            .zip(self.normals.chunks_exact(3))
            .zip(self.texcoords.chunks_exact(2))
            .map(|((position, normal), texcoord)| Vertex {
                position: [position[0], position[1], position[2]],
                normal: [normal[0], normal[1], normal[2]],
                texcoord: [texcoord[0], texcoord[1]],
            })
            .collect()
    }
}

fn attribute_count(
    attribute: &'static str,
    values: &[f32],
    components: usize,
) -> Result<usize, MeshError> {
    if values.len() % components != 0 {
        return Err(MeshError::AttributeLength {
            attribute,
            len: values.len(),
            components,
        });
    }
    Ok(values.len() / components)
}

#[rustfmt::skip]
const CUBE_POSITIONS: [f32; 72] = [
    1.0, 1.0, -1.0,   1.0, 1.0, 1.0,   1.0, -1.0, 1.0,   1.0, -1.0, -1.0, // +x
    -1.0, 1.0, 1.0,   -1.0, 1.0, -1.0,   -1.0, -1.0, -1.0,   -1.0, -1.0, 1.0, // -x
    -1.0, 1.0, 1.0,   1.0, 1.0, 1.0,   1.0, 1.0, -1.0,   -1.0, 1.0, -1.0, // +y
    -1.0, -1.0, -1.0,   1.0, -1.0, -1.0,   1.0, -1.0, 1.0,   -1.0, -1.0, 1.0, // -y
    1.0, 1.0, 1.0,   -1.0, 1.0, 1.0,   -1.0, -1.0, 1.0,   1.0, -1.0, 1.0, // +z
    -1.0, 1.0, -1.0,   1.0, 1.0, -1.0,   1.0, -1.0, -1.0,   -1.0, -1.0, -1.0, // -z
];

#[rustfmt::skip]
const CUBE_NORMALS: [f32; 72] = [
    1.0, 0.0, 0.0,   1.0, 0.0, 0.0,   1.0, 0.0, 0.0,   1.0, 0.0, 0.0,
    -1.0, 0.0, 0.0,   -1.0, 0.0, 0.0,   -1.0, 0.0, 0.0,   -1.0, 0.0, 0.0,
    0.0, 1.0, 0.0,   0.0, 1.0, 0.0,   0.0, 1.0, 0.0,   0.0, 1.0, 0.0,
    0.0, -1.0, 0.0,   0.0, -1.0, 0.0,   0.0, -1.0, 0.0,   0.0, -1.0, 0.0,
    0.0, 0.0, 1.0,   0.0, 0.0, 1.0,   0.0, 0.0, 1.0,   0.0, 0.0, 1.0,
    0.0, 0.0, -1.0,   0.0, 0.0, -1.0,   0.0, 0.0, -1.0,   0.0, 0.0, -1.0,
];

#[rustfmt::skip]
const CUBE_TEXCOORDS: [f32; 48] = [
    1.0, 0.0,   0.0, 0.0,   0.0, 1.0,   1.0, 1.0,
    1.0, 0.0,   0.0, 0.0,   0.0, 1.0,   1.0, 1.0,
    1.0, 0.0,   0.0, 0.0,   0.0, 1.0,   1.0, 1.0,
    1.0, 0.0,   0.0, 0.0,   0.0, 1.0,   1.0, 1.0,
    1.0, 0.0,   0.0, 0.0,   0.0, 1.0,   1.0, 1.0,
    1.0, 0.0,   0.0, 0.0,   0.0, 1.0,   1.0, 1.0,
];

#[rustfmt::skip]
const CUBE_INDICES: [u16; 36] = [
    0, 1, 2, 0, 2, 3,
    4, 5, 6, 4, 6, 7,
    8, 9, 10, 8, 10, 11,
    12, 13, 14, 12, 14, 15,
    16, 17, 18, 16, 18, 19,
    20, 21, 22, 20, 22, 23,
];

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn cube_has_twelve_triangles_over_24_vertices() {
        let cube = Mesh::cube();
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.indices().len(), 36);
        assert_eq!(cube.triangle_count(), 12);
        assert!(cube.indices().iter().all(|&index| index <= 23));
    }

    #[test]
    fn cube_literal_passes_validation() {
        let cube = Mesh::cube();
        let rebuilt = Mesh::new(
            cube.positions().to_vec(),
            cube.normals().to_vec(),
            cube.texcoords().to_vec(),
            cube.indices().to_vec(),
        )
        .unwrap();
        assert_eq!(rebuilt, cube);
    }

    #[test]
    fn cube_vertices_lie_on_their_face_plane() {
        for vertex in Mesh::cube().vertices() {
            let position = Vec3::from(vertex.position);
            let normal = Vec3::from(vertex.normal);
            assert_eq!(position.dot(normal), 1.0);
        }
    }

    #[test]
    fn cube_triangles_wind_counter_clockwise_from_outside() {
        let cube = Mesh::cube();
        let vertices = cube.vertices();
        for triangle in cube.indices().chunks_exact(3) {
            let [a, b, c] = [triangle[0], triangle[1], triangle[2]]
                .map(|index| Vec3::from(vertices[usize::from(index)].position));
            let face_normal = (b - a).cross(c - a);
            let normal = Vec3::from(vertices[usize::from(triangle[0])].normal);
            assert!(face_normal.dot(normal) > 0.0);
        }
    }

    #[test]
    fn vertices_interleave_attributes() {
        let cube = Mesh::cube();
        let vertices = cube.vertices();
        assert_eq!(vertices.len(), 24);
        assert_eq!(
            vertices[5],
            Vertex {
                position: [-1.0, 1.0, -1.0],
                normal: [-1.0, 0.0, 0.0],
                texcoord: [0.0, 0.0],
            }
        );
        assert_eq!(Vertex::STRIDE, 32);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let err = Mesh::new(
            vec![0.0; 9],
            vec![0.0; 9],
            vec![0.0; 6],
            vec![0, 1, 3],
        )
        .unwrap_err();
        assert_eq!(
            err,
            MeshError::IndexOutOfRange {
                index: 3,
                vertex_count: 3
            }
        );
    }

    #[test]
    fn mismatched_attributes_are_rejected() {
        let err = Mesh::new(vec![0.0; 9], vec![0.0; 6], vec![0.0; 6], vec![0, 1, 2])
            .unwrap_err();
        assert_eq!(
            err,
            MeshError::VertexCountMismatch {
                attribute: "normal",
                expected: 3,
                found: 2
            }
        );

        let err = Mesh::new(vec![0.0; 8], vec![0.0; 9], vec![0.0; 6], vec![])
            .unwrap_err();
        assert!(matches!(err, MeshError::AttributeLength { attribute: "position", .. }));
    }

    #[test]
    fn partial_triangle_is_rejected() {
        let err = Mesh::new(vec![0.0; 9], vec![0.0; 9], vec![0.0; 6], vec![0, 1])
            .unwrap_err();
        assert_eq!(err, MeshError::PartialTriangle(2));
    }
}

/// Mesh geometry: vertices, textured faces and placement in world space.
use nalgebra::{Vector2, Vector3};

use crate::color;
use crate::transform::MeshTransform;

/// A flat-shaded triangle referencing three mesh vertices.
///
/// Indices are 0-based and must be valid for the owning mesh's vertex list.
/// UVs use a top-down convention: `v = 0` is the first texture row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    pub a: usize,
    pub b: usize,
    pub c: usize,
    pub uvs: [Vector2<f32>; 3],
    pub color: u32,
}

impl Face {
    pub fn new(a: usize, b: usize, c: usize, uvs: [Vector2<f32>; 3], color: u32) -> Self {
        Self { a, b, c, uvs, color }
    }

    /// The three vertex indices in winding order.
    #[inline]
    pub fn indices(&self) -> [usize; 3] {
        [self.a, self.b, self.c]
    }
}

/// A 3D mesh composed of shared vertices and triangle faces.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vector3<f32>>,
    pub faces: Vec<Face>,
    pub transform: MeshTransform,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            transform: MeshTransform::default(),
        }
    }

    pub fn with_capacity(vertices: usize, faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            faces: Vec::with_capacity(faces),
            transform: MeshTransform::default(),
        }
    }

    /// Appends a vertex and returns its index.
    pub fn add_vertex(&mut self, vertex: Vector3<f32>) -> usize {
        self.vertices.push(vertex);
        self.vertices.len() - 1
    }

    pub fn add_face(&mut self, face: Face) {
        self.faces.push(face);
    }

    /// The positions of a face's corners in model space.
    ///
    /// Panics if the face holds an index outside the vertex list; loaders
    /// are responsible for rejecting such faces.
    #[inline]
    pub fn face_vertices(&self, face: &Face) -> [Vector3<f32>; 3] {
        face.indices().map(|i| self.vertices[i])
    }

    /// Create a cube spanning `[-half, half]` on every axis.
    ///
    /// Faces are wound clockwise when seen from outside in the left-handed
    /// view space, so `(b - a) x (c - a)` points out of the cube. Every side
    /// is textured by the full `[0, 1]` UV square.
    pub fn cube(size: f32) -> Self {
        let half = size / 2.0;
        let mut mesh = Self::with_capacity(8, 12);

        for (x, y, z) in [
            (-1.0, -1.0, -1.0),
            (-1.0, 1.0, -1.0),
            (1.0, 1.0, -1.0),
            (1.0, -1.0, -1.0),
            (1.0, 1.0, 1.0),
            (1.0, -1.0, 1.0),
            (-1.0, 1.0, 1.0),
            (-1.0, -1.0, 1.0),
        ] {
            mesh.add_vertex(Vector3::new(x, y, z) * half);
        }

        let upper = [Vector2::new(0.0, 1.0), Vector2::new(0.0, 0.0), Vector2::new(1.0, 0.0)];
        let lower = [Vector2::new(0.0, 1.0), Vector2::new(1.0, 0.0), Vector2::new(1.0, 1.0)];

        // Each side is a quad (p, q, r, s) split along its p-r diagonal.
        for [p, q, r, s] in [
            [0, 1, 2, 3], // front
            [3, 2, 4, 5], // right
            [5, 4, 6, 7], // back
            [7, 6, 1, 0], // left
            [1, 6, 4, 2], // top
            [5, 7, 0, 3], // bottom
        ] {
            mesh.add_face(Face::new(p, q, r, upper, color::WHITE));
            mesh.add_face(Face::new(p, r, s, lower, color::WHITE));
        }

        mesh
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

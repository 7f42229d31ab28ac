use super::Vertex;


/// Represents a vec-based mesh on the CPU
#[derive(Clone, Debug)]
pub struct Mesh<V: Vertex> {
    pub verts: Vec<V>,
    pub indices: Vec<u16>
}


impl<V: Vertex> Mesh<V> {
    /// Create a new `Mesh`.
    pub fn new() -> Self { Self { verts: Vec::new(), indices: Vec::new() } }

    /// Get a slice referencing the vertices of this mesh.
    pub fn vertices(&self) -> &[V] { &self.verts }

    pub fn indices(&self) -> &[u16] { &self.indices }

    pub fn is_empty(&self) -> bool { self.indices.is_empty() }

    /// Appends a quad given counter-clockwise corners, as two triangles.
    pub fn push_quad(&mut self, corners: [V; 4]) {
        let base = self.verts.len() as u16;
        self.verts.extend(corners);
        self.indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
}

impl<V: Vertex> Default for Mesh<V> {
    fn default() -> Self { Self::new() }
}

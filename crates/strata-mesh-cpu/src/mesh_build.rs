use hashbrown::HashMap;
use strata_geom::{Aabb, Vec2, Vec3};

/// Triangle list for one quad, as offsets into its four corners.
pub const QUAD_TRIANGLES: [u32; 6] = [3, 1, 0, 3, 2, 1];

/// One renderable face: four corners sharing a normal, each with a material
/// and a damage-overlay texcoord.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quad {
    pub corners: [Vec3; 4],
    pub normal: Vec3,
    pub uv0: [Vec2; 4],
    pub uv1: [Vec2; 4],
}

/// Finished vertex/index buffers handed to the renderer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Surface {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uv0: Vec<[f32; 2]>,
    pub uv1: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
    pub bounds: Option<Aabb>,
}

impl Surface {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

// Exact bit pattern of (position, normal, uv0, uv1).
type VertexKey = [u32; 10];

#[inline]
fn vertex_key(p: Vec3, n: Vec3, a: Vec2, b: Vec2) -> VertexKey {
    [
        p.x.to_bits(),
        p.y.to_bits(),
        p.z.to_bits(),
        n.x.to_bits(),
        n.y.to_bits(),
        n.z.to_bits(),
        a.x.to_bits(),
        a.y.to_bits(),
        b.x.to_bits(),
        b.y.to_bits(),
    ]
}

/// Accumulates quads into one surface, storing each distinct vertex once.
#[derive(Default)]
pub struct MeshBuild {
    out: Surface,
    lookup: HashMap<VertexKey, u32>,
    quads: usize,
}

impl MeshBuild {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-reserve capacity for approximately `n_quads` quads worth of data.
    #[inline]
    pub fn reserve_quads(&mut self, n_quads: usize) {
        let s = &mut self.out;
        s.positions.reserve(n_quads * 4);
        s.normals.reserve(n_quads * 4);
        s.uv0.reserve(n_quads * 4);
        s.uv1.reserve(n_quads * 4);
        s.indices.reserve(n_quads * QUAD_TRIANGLES.len());
        self.lookup.reserve(n_quads * 4);
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.quads
    }

    fn vertex(&mut self, p: Vec3, n: Vec3, a: Vec2, b: Vec2) -> u32 {
        let key = vertex_key(p, n, a, b);
        if let Some(&i) = self.lookup.get(&key) {
            return i;
        }
        let s = &mut self.out;
        let i = s.positions.len() as u32;
        s.positions.push(p.to_array());
        s.normals.push(n.to_array());
        s.uv0.push(a.to_array());
        s.uv1.push(b.to_array());
        self.lookup.insert(key, i);
        i
    }

    /// Appends a quad, reusing any vertex whose full tuple already exists.
    pub fn add_quad(&mut self, q: &Quad) {
        let mut local = [0u32; 4];
        for (k, slot) in local.iter_mut().enumerate() {
            *slot = self.vertex(q.corners[k], q.normal, q.uv0[k], q.uv1[k]);
        }
        self.out
            .indices
            .extend(QUAD_TRIANGLES.iter().map(|&t| local[t as usize]));
        self.quads += 1;
    }

    pub fn finish(mut self) -> Surface {
        self.out.bounds = Aabb::from_points(self.out.positions.iter().map(|&p| Vec3::from(p)));
        self.out
    }
}

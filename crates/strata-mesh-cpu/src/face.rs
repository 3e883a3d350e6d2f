use strata_geom::{IVec3, Vec3};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Face {
    PosY = 0,
    NegY = 1,
    PosX = 2,
    NegX = 3,
    PosZ = 4,
    NegZ = 5,
}

// Unit cube corners around the voxel centre, bottom ring then top ring.
const P0: Vec3 = Vec3::new(-0.5, -0.5, 0.5);
const P1: Vec3 = Vec3::new(0.5, -0.5, 0.5);
const P2: Vec3 = Vec3::new(0.5, -0.5, -0.5);
const P3: Vec3 = Vec3::new(-0.5, -0.5, -0.5);
const P4: Vec3 = Vec3::new(-0.5, 0.5, 0.5);
const P5: Vec3 = Vec3::new(0.5, 0.5, 0.5);
const P6: Vec3 = Vec3::new(0.5, 0.5, -0.5);
const P7: Vec3 = Vec3::new(-0.5, 0.5, -0.5);

impl Face {
    /// Emission order: front, back, left, right, top, bottom.
    pub const ALL: [Face; 6] = [
        Face::PosZ,
        Face::NegZ,
        Face::NegX,
        Face::PosX,
        Face::PosY,
        Face::NegY,
    ];

    /// Returns the unit-normal vector for this face.
    #[inline]
    pub fn normal(self) -> Vec3 {
        let (dx, dy, dz) = self.delta();
        Vec3::new(dx as f32, dy as f32, dz as f32)
    }

    /// Returns the integer grid delta `(dx,dy,dz)` when stepping out of this face.
    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        match self {
            Face::PosY => (0, 1, 0),
            Face::NegY => (0, -1, 0),
            Face::PosX => (1, 0, 0),
            Face::NegX => (-1, 0, 0),
            Face::PosZ => (0, 0, 1),
            Face::NegZ => (0, 0, -1),
        }
    }

    #[inline]
    pub fn step(self) -> IVec3 {
        self.delta().into()
    }

    /// Quad corners relative to the voxel centre, in the order the atlas
    /// corners `[uv11, uv01, uv00, uv10]` are laid onto them.
    #[inline]
    pub fn corners(self) -> [Vec3; 4] {
        match self {
            Face::PosZ => [P4, P5, P1, P0],
            Face::NegZ => [P6, P7, P3, P2],
            Face::NegX => [P7, P4, P0, P3],
            Face::PosX => [P5, P6, P2, P1],
            Face::PosY => [P7, P6, P5, P4],
            Face::NegY => [P0, P1, P2, P3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_lie_on_the_face_plane() {
        for f in Face::ALL {
            let n = f.normal();
            for c in f.corners() {
                assert_eq!(c.dot(n), 0.5, "{f:?}");
            }
        }
    }

    #[test]
    fn triangles_wind_consistently_with_normal() {
        for f in Face::ALL {
            let c = f.corners();
            let e1 = c[1] - c[3];
            let e2 = c[0] - c[3];
            let cross = Vec3::new(
                e1.y * e2.z - e1.z * e2.y,
                e1.z * e2.x - e1.x * e2.z,
                e1.x * e2.y - e1.y * e2.x,
            );
            assert!(cross.dot(f.normal()) > 0.0, "{f:?}");
        }
    }
}

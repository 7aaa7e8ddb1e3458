//! Surface extraction for [`Solid`]s.
//!
//! Surface Nets over a cubic sample lattice: one vertex per cell whose
//! corners change sign, placed at the average of the interpolated edge
//! crossings, and one quad around every lattice edge that crosses the
//! surface. The lattice is padded by a cell on every side so surfaces
//! touching the bounds still close.

use log::debug;
use pterosphera_math::{Aabb, Point3, Vec3};
use rayon::prelude::*;

use crate::solid::Solid;
use crate::{KernelError, Result};

/// Upper bound on cells along the longest axis.
pub const MAX_CELLS: usize = 4096;

const NO_VERTEX: u32 = u32::MAX;

/// Cube corner offsets.
const CORNERS: [(usize, usize, usize); 8] = [
    (0, 0, 0),
    (1, 0, 0),
    (1, 1, 0),
    (0, 1, 0),
    (0, 0, 1),
    (1, 0, 1),
    (1, 1, 1),
    (0, 1, 1),
];

/// Cube edges as corner index pairs.
const EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0),
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

/// Indexed triangle mesh with counter-clockwise, outward-facing triangles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    /// Flat array of vertex positions: `[x0, y0, z0, x1, y1, z1, ...]`.
    pub vertices: Vec<f32>,
    /// Flat array of triangle indices: `[i0, i1, i2, ...]`.
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Whether the mesh has no triangles.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    fn vertex(&self, i: u32) -> [f32; 3] {
        let i = i as usize * 3;
        [self.vertices[i], self.vertices[i + 1], self.vertices[i + 2]]
    }

    /// Iterate triangles as vertex triples.
    pub fn triangles(&self) -> impl Iterator<Item = [[f32; 3]; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|t| [self.vertex(t[0]), self.vertex(t[1]), self.vertex(t[2])])
    }

    /// Bounding box of the vertices.
    pub fn bounds(&self) -> Option<Aabb> {
        let points: Vec<Point3> = self
            .vertices
            .chunks_exact(3)
            .map(|v| Point3::new(v[0] as f64, v[1] as f64, v[2] as f64))
            .collect();
        Aabb::from_points(&points)
    }

    /// Scale every vertex about the origin.
    pub fn scale(&mut self, factor: f32) {
        for v in &mut self.vertices {
            *v *= factor;
        }
    }

    /// Enclosed volume; positive when triangles face outward.
    pub fn signed_volume(&self) -> f64 {
        self.triangles()
            .map(|[a, b, c]| {
                let a = Vec3::new(a[0] as f64, a[1] as f64, a[2] as f64);
                let b = Vec3::new(b[0] as f64, b[1] as f64, b[2] as f64);
                let c = Vec3::new(c[0] as f64, c[1] as f64, c[2] as f64);
                a.dot(&b.cross(&c)) / 6.0
            })
            .sum()
    }
}

/// Sample lattice: `dims` cells per axis, corners at `origin + i * step`.
struct Lattice {
    origin: Point3,
    step: f64,
    dims: [usize; 3],
}

impl Lattice {
    fn corner_index(&self, x: usize, y: usize, z: usize) -> usize {
        let (cx, cy) = (self.dims[0] + 1, self.dims[1] + 1);
        (z * cy + y) * cx + x
    }

    fn cell_index(&self, x: usize, y: usize, z: usize) -> usize {
        (z * self.dims[1] + y) * self.dims[0] + x
    }

    fn corner_pos(&self, x: f64, y: f64, z: f64) -> Point3 {
        self.origin + Vec3::new(x, y, z) * self.step
    }
}

/// Mesh `solid` with `cells` lattice cells along its longest axis.
///
/// Fails with [`KernelError::EmptySolid`] when the solid has no geometry
/// and [`KernelError::InvalidResolution`] for `cells` of 0 or above
/// [`MAX_CELLS`].
pub fn mesh_solid(solid: &Solid, cells: usize) -> Result<TriangleMesh> {
    if cells == 0 || cells > MAX_CELLS {
        return Err(KernelError::InvalidResolution(cells));
    }
    let bounds = solid.bounds().ok_or(KernelError::EmptySolid)?;
    let longest = bounds.longest_extent();
    if !longest.is_finite() || longest <= 0.0 {
        return Err(KernelError::EmptySolid);
    }

    let step = longest / cells as f64;
    let extent = bounds.extent();
    let axis_cells = |e: f64| (e / step).ceil().max(1.0) as usize + 2;
    let lattice = Lattice {
        origin: bounds.min - Vec3::repeat(step),
        step,
        dims: [axis_cells(extent.x), axis_cells(extent.y), axis_cells(extent.z)],
    };

    let field = sample_field(solid, &lattice);
    let (vertices, cell_vertex) = place_vertices(&field, &lattice);
    let indices = stitch_quads(&field, &cell_vertex, &lattice);

    let mesh = TriangleMesh { vertices, indices };
    debug!(
        "meshed {} nodes on {}x{}x{} lattice: {} triangles",
        solid.node_count(),
        lattice.dims[0],
        lattice.dims[1],
        lattice.dims[2],
        mesh.num_triangles()
    );
    Ok(mesh)
}

fn sample_field(solid: &Solid, lattice: &Lattice) -> Vec<f32> {
    let [nx, ny, nz] = lattice.dims;
    let slice = (nx + 1) * (ny + 1);
    let mut field = vec![0.0f32; slice * (nz + 1)];
    field
        .par_chunks_mut(slice)
        .enumerate()
        .for_each(|(z, values)| {
            for y in 0..=ny {
                for x in 0..=nx {
                    let p = lattice.corner_pos(x as f64, y as f64, z as f64);
                    values[y * (nx + 1) + x] = solid.distance(&p) as f32;
                }
            }
        });
    field
}

fn inside(value: f32) -> bool {
    value < 0.0
}

fn place_vertices(field: &[f32], lattice: &Lattice) -> (Vec<f32>, Vec<u32>) {
    let [nx, ny, nz] = lattice.dims;

    let slices: Vec<Vec<Option<Point3>>> = (0..nz)
        .into_par_iter()
        .map(|z| {
            let mut row = Vec::with_capacity(nx * ny);
            for y in 0..ny {
                for x in 0..nx {
                    row.push(cell_vertex(field, lattice, x, y, z));
                }
            }
            row
        })
        .collect();

    let mut vertices = Vec::new();
    let mut cell_vertex = vec![NO_VERTEX; nx * ny * nz];
    for (i, p) in slices.into_iter().flatten().enumerate() {
        if let Some(p) = p {
            cell_vertex[i] = (vertices.len() / 3) as u32;
            vertices.extend_from_slice(&[p.x as f32, p.y as f32, p.z as f32]);
        }
    }
    (vertices, cell_vertex)
}

fn cell_vertex(field: &[f32], lattice: &Lattice, x: usize, y: usize, z: usize) -> Option<Point3> {
    let values = CORNERS.map(|(dx, dy, dz)| field[lattice.corner_index(x + dx, y + dy, z + dz)]);
    if values.iter().all(|v| inside(*v)) || values.iter().all(|v| !inside(*v)) {
        return None;
    }

    let mut acc = Vec3::zeros();
    let mut n = 0u32;
    for (a, b) in EDGES {
        let (va, vb) = (values[a], values[b]);
        if inside(va) == inside(vb) {
            continue;
        }
        let t = f64::from(va / (va - vb));
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.5 };
        let (ax, ay, az) = CORNERS[a];
        let (bx, by, bz) = CORNERS[b];
        let pa = Vec3::new(ax as f64, ay as f64, az as f64);
        let pb = Vec3::new(bx as f64, by as f64, bz as f64);
        acc += pa + (pb - pa) * t;
        n += 1;
    }
    let local = acc / n as f64;
    Some(lattice.corner_pos(x as f64 + local.x, y as f64 + local.y, z as f64 + local.z))
}

fn stitch_quads(field: &[f32], cell_vertex: &[u32], lattice: &Lattice) -> Vec<u32> {
    let [nx, ny, nz] = lattice.dims;
    let mut indices = Vec::new();

    let cell = |x: usize, y: usize, z: usize| cell_vertex[lattice.cell_index(x, y, z)];
    let mut emit = |quad: [u32; 4]| {
        if quad.contains(&NO_VERTEX) {
            return;
        }
        let [a, b, c, d] = quad;
        indices.extend_from_slice(&[a, b, c, a, c, d]);
    };
    let crossing = |x0: usize, y0: usize, z0: usize, x1: usize, y1: usize, z1: usize| {
        let a = inside(field[lattice.corner_index(x0, y0, z0)]);
        let b = inside(field[lattice.corner_index(x1, y1, z1)]);
        (a != b).then_some(a)
    };

    // Edges along X, shared by the four cells around them in the YZ plane.
    for z in 1..nz {
        for y in 1..ny {
            for x in 0..nx {
                let Some(a_inside) = crossing(x, y, z, x + 1, y, z) else {
                    continue;
                };
                let (i00, i10, i11, i01) = (
                    cell(x, y - 1, z - 1),
                    cell(x, y, z - 1),
                    cell(x, y, z),
                    cell(x, y - 1, z),
                );
                if a_inside {
                    emit([i00, i10, i11, i01]);
                } else {
                    emit([i00, i01, i11, i10]);
                }
            }
        }
    }

    // Edges along Y.
    for z in 1..nz {
        for y in 0..ny {
            for x in 1..nx {
                let Some(a_inside) = crossing(x, y, z, x, y + 1, z) else {
                    continue;
                };
                let (i00, i10, i11, i01) = (
                    cell(x - 1, y, z - 1),
                    cell(x, y, z - 1),
                    cell(x, y, z),
                    cell(x - 1, y, z),
                );
                if a_inside {
                    emit([i00, i01, i11, i10]);
                } else {
                    emit([i00, i10, i11, i01]);
                }
            }
        }
    }

    // Edges along Z.
    for z in 0..nz {
        for y in 1..ny {
            for x in 1..nx {
                let Some(a_inside) = crossing(x, y, z, x, y, z + 1) else {
                    continue;
                };
                let (i00, i10, i11, i01) = (
                    cell(x - 1, y - 1, z),
                    cell(x, y - 1, z),
                    cell(x, y, z),
                    cell(x - 1, y, z),
                );
                if a_inside {
                    emit([i00, i10, i11, i01]);
                } else {
                    emit([i00, i01, i11, i10]);
                }
            }
        }
    }

    indices
}

//! Surface-nets style contouring of an implicit field.
//!
//! The field is sampled on a regular lattice of corners. Every cell whose
//! corners disagree gets one vertex, placed by bisecting the first
//! disagreeing cell edge or diagonal. Every lattice edge that crosses the
//! surface then emits a quad joining the vertices of the four cells around
//! it.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};

use nosecone_kernel::{KernelError, NormalField, Point3d, ScalarField, Vec3};

use crate::config::ContourConfig;
use crate::{CountingSink, TriangleSink};

/// Corner offsets from a cell's base corner, in the order they are tried
/// when placing the cell's vertex: main diagonal, face diagonals, edges.
pub const BISECTION_ORDER: [[usize; 3]; 7] = [
    [1, 1, 1],
    [1, 0, 1],
    [1, 1, 0],
    [0, 1, 1],
    [1, 0, 0],
    [0, 1, 0],
    [0, 0, 1],
];

/// Upper bound on halvings; a tolerance below the bracket's ulp would
/// otherwise never be reached.
pub const MAX_BISECTION_STEPS: usize = 128;

/// Locate the inside/outside transition between `a` and `b` to within
/// `tolerance` (Euclidean). The endpoints must classify differently.
pub fn bisect(
    field: &dyn ScalarField,
    a: Point3d,
    b: Point3d,
    tolerance: f64,
) -> Result<Point3d, KernelError> {
    let tolerance = KernelError::require_positive("tolerance", tolerance)?;
    let inside_a = field.is_inside(a);
    if inside_a == field.is_inside(b) {
        return Err(KernelError::SameSignBracket {
            a,
            b,
            side: if inside_a { "inside" } else { "outside" },
        });
    }

    let (mut lo, mut hi) = (a, b);
    let mut steps = 0;
    while lo.distance_to(&hi) >= tolerance && steps < MAX_BISECTION_STEPS {
        let mid = lo.midpoint(&hi);
        if field.is_inside(mid) == inside_a {
            lo = mid;
        } else {
            hi = mid;
        }
        steps += 1;
    }
    trace!(steps, "bisected");
    Ok(lo.midpoint(&hi))
}

/// Where a cell's vertex goes when no corner disagrees with the base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VertexPlacement {
    #[default]
    Corner,
    CellCenter,
}

/// Quad orientation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuadWinding {
    /// Fixed cyclic order per edge axis, regardless of which side is inside.
    /// Half the quads of a closed surface face inward.
    Lattice,
    /// Reverse the order when the edge's base corner is outside, so every
    /// quad faces from the inside toward the outside.
    #[default]
    InsideOut,
}

/// Axis-aligned sampling volume split into `span` cells per axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridBounds {
    pub min: Point3d,
    pub max: Point3d,
    pub span: usize,
}

impl GridBounds {
    pub fn new(min: Point3d, max: Point3d, span: usize) -> Self {
        Self { min, max, span }
    }

    /// Cube of half-width `half_extent` around `center`.
    pub fn cube(center: Point3d, half_extent: f64, span: usize) -> Self {
        let h = Vec3::new(half_extent, half_extent, half_extent);
        Self::new(center - h, center + h, span)
    }

    pub fn check(&self) -> Result<(), KernelError> {
        if self.span < 1 {
            return Err(KernelError::InsufficientSegments {
                required: 1,
                provided: self.span,
            });
        }
        let extent = self.max - self.min;
        KernelError::require_positive("bounds.x", extent.x)?;
        KernelError::require_positive("bounds.y", extent.y)?;
        KernelError::require_positive("bounds.z", extent.z)?;
        Ok(())
    }

    /// Edge lengths of one cell.
    pub fn cell_size(&self) -> Vec3 {
        (self.max - self.min) / self.span as f64
    }

    /// Lattice corner `(ix, iy, iz)`, each in `0..=span`.
    pub fn corner(&self, ix: usize, iy: usize, iz: usize) -> Point3d {
        let d = self.cell_size();
        Point3d::new(
            self.min.x + ix as f64 * d.x,
            self.min.y + iy as f64 * d.y,
            self.min.z + iz as f64 * d.z,
        )
    }

    pub fn corner_count(&self) -> usize {
        (self.span + 1).pow(3)
    }

    pub fn cell_count(&self) -> usize {
        self.span.pow(3)
    }
}

/// Sampled field: corner classification plus one vertex per active cell.
#[derive(Debug, Clone)]
pub struct GridField {
    bounds: GridBounds,
    placement: VertexPlacement,
    inside: Vec<bool>,
    vertices: Vec<Option<Point3d>>,
}

impl GridField {
    /// Classify every corner, then place a vertex in every cell that
    /// straddles the surface.
    pub fn sample(
        field: &dyn ScalarField,
        bounds: GridBounds,
        config: &ContourConfig,
    ) -> Result<Self, KernelError> {
        bounds.check()?;
        let n = bounds.span;

        let mut inside = Vec::with_capacity(bounds.corner_count());
        for iz in 0..=n {
            for iy in 0..=n {
                for ix in 0..=n {
                    inside.push(field.is_inside(bounds.corner(ix, iy, iz)));
                }
            }
        }

        let mut grid = Self {
            bounds,
            placement: config.placement,
            inside,
            vertices: vec![None; bounds.cell_count()],
        };

        for iz in 0..n {
            for iy in 0..n {
                for ix in 0..n {
                    let base = grid.is_inside(ix, iy, iz);
                    let crossing = BISECTION_ORDER
                        .iter()
                        .find(|[dx, dy, dz]| grid.is_inside(ix + dx, iy + dy, iz + dz) != base);
                    if let Some([dx, dy, dz]) = crossing {
                        let vertex = bisect(
                            field,
                            bounds.corner(ix, iy, iz),
                            bounds.corner(ix + dx, iy + dy, iz + dz),
                            config.tolerance,
                        )?;
                        let cell = grid.cell_index(ix, iy, iz);
                        grid.vertices[cell] = Some(vertex);
                    }
                }
            }
        }
        debug!(active = grid.active_cells(), span = n, "grid sampled");
        Ok(grid)
    }

    pub fn bounds(&self) -> &GridBounds {
        &self.bounds
    }

    fn corner_index(&self, ix: usize, iy: usize, iz: usize) -> usize {
        let side = self.bounds.span + 1;
        (iz * side + iy) * side + ix
    }

    fn cell_index(&self, ix: usize, iy: usize, iz: usize) -> usize {
        let side = self.bounds.span;
        (iz * side + iy) * side + ix
    }

    pub fn is_inside(&self, ix: usize, iy: usize, iz: usize) -> bool {
        self.inside[self.corner_index(ix, iy, iz)]
    }

    /// Whether the cell straddles the surface.
    pub fn is_active(&self, ix: usize, iy: usize, iz: usize) -> bool {
        self.vertices[self.cell_index(ix, iy, iz)].is_some()
    }

    pub fn active_cells(&self) -> usize {
        self.vertices.iter().filter(|v| v.is_some()).count()
    }

    /// The cell's vertex; inactive cells fall back to the configured
    /// placement.
    pub fn vertex(&self, ix: usize, iy: usize, iz: usize) -> Point3d {
        match self.vertices[self.cell_index(ix, iy, iz)] {
            Some(v) => v,
            None => {
                let base = self.bounds.corner(ix, iy, iz);
                match self.placement {
                    VertexPlacement::Corner => base,
                    VertexPlacement::CellCenter => base + self.bounds.cell_size() * 0.5,
                }
            }
        }
    }
}

/// What one contouring pass produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContourSummary {
    pub corners: usize,
    pub active_cells: usize,
    pub quads: usize,
    pub triangles: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ImplicitSurfaceContourer {
    pub config: ContourConfig,
}

impl ImplicitSurfaceContourer {
    pub fn new(config: ContourConfig) -> Self {
        Self { config }
    }

    /// Contour `field` over `bounds` into `sink`. When `normals` is given,
    /// each quad's facet normal is sampled at its centroid; otherwise it is
    /// zero.
    #[instrument(skip_all, fields(span = bounds.span))]
    pub fn contour(
        &self,
        field: &dyn ScalarField,
        normals: Option<&dyn NormalField>,
        bounds: GridBounds,
        sink: &mut dyn TriangleSink,
    ) -> Result<ContourSummary, KernelError> {
        let grid = GridField::sample(field, bounds, &self.config)?;
        let mut sink = CountingSink::new(sink);
        let n = bounds.span;
        let mut quads = 0usize;

        for iz in 0..n {
            for iy in 0..n {
                for ix in 0..n {
                    let base = grid.is_inside(ix, iy, iz);

                    // Edge along x, cells cycled over (y, z).
                    if iy >= 1 && iz >= 1 && base != grid.is_inside(ix + 1, iy, iz) {
                        let quad = [
                            grid.vertex(ix, iy - 1, iz - 1),
                            grid.vertex(ix, iy, iz - 1),
                            grid.vertex(ix, iy, iz),
                            grid.vertex(ix, iy - 1, iz),
                        ];
                        self.emit(quad, base, normals, &mut sink)?;
                        quads += 1;
                    }
                    // Edge along y, cells cycled over (z, x).
                    if iz >= 1 && ix >= 1 && base != grid.is_inside(ix, iy + 1, iz) {
                        let quad = [
                            grid.vertex(ix - 1, iy, iz - 1),
                            grid.vertex(ix - 1, iy, iz),
                            grid.vertex(ix, iy, iz),
                            grid.vertex(ix, iy, iz - 1),
                        ];
                        self.emit(quad, base, normals, &mut sink)?;
                        quads += 1;
                    }
                    // Edge along z, cells cycled over (x, y).
                    if ix >= 1 && iy >= 1 && base != grid.is_inside(ix, iy, iz + 1) {
                        let quad = [
                            grid.vertex(ix - 1, iy - 1, iz),
                            grid.vertex(ix, iy - 1, iz),
                            grid.vertex(ix, iy, iz),
                            grid.vertex(ix - 1, iy, iz),
                        ];
                        self.emit(quad, base, normals, &mut sink)?;
                        quads += 1;
                    }
                }
            }
        }

        let summary = ContourSummary {
            corners: bounds.corner_count(),
            active_cells: grid.active_cells(),
            quads,
            triangles: sink.count(),
        };
        info!(
            active_cells = summary.active_cells,
            quads = summary.quads,
            triangles = summary.triangles,
            "contour complete"
        );
        Ok(summary)
    }

    fn emit(
        &self,
        quad: [Point3d; 4],
        base_inside: bool,
        normals: Option<&dyn NormalField>,
        sink: &mut dyn TriangleSink,
    ) -> Result<(), KernelError> {
        let [p0, p1, p2, p3] = quad;
        let normal = match normals {
            Some(field) => {
                let c = quad.iter().fold(Vec3::ZERO, |acc, p| acc + p.to_vec3()) / 4.0;
                field.normal(Point3d::new(c.x, c.y, c.z))
            }
            None => Vec3::ZERO,
        };
        match self.config.winding {
            QuadWinding::InsideOut if !base_inside => sink.square(normal, p0, p3, p2, p1),
            _ => sink.square(normal, p0, p1, p2, p3),
        }
    }
}

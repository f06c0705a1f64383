//! Workspace bounds derived from the rig's mast footprint
//!
//! The bounds are computed once at initialisation and are immutable afterwards, they only
//! change if the rig itself changes.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use geo::{coord, Area, Centroid, Coord, LineString, Point, Polygon};

// Internal
use super::Params;
use crate::rig::RigConfig;
use util::maths::norm;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Inset polygons with an absolute area below this are treated as degenerate.
///
/// Units: square meters
const DEGENERATE_AREA_M2: f64 = 1e-9;

/// Cross products below this treat adjacent edges as parallel during insetting.
const PARALLEL_EDGE_EPSILON: f64 = 1e-12;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Safety boundaries derived from the static mast positions.
#[derive(Debug, Clone)]
pub struct WorkspaceBounds {
    /// The mast footprint polygon, vertices in mast order.
    pub footprint: Polygon<f64>,

    /// Centroid of the footprint.
    pub centroid: Point<f64>,

    /// Minimum distance from the centroid to any footprint vertex.
    ///
    /// Units: meters
    pub min_vertex_dist_m: f64,

    /// The workspace margin, `min_vertex_dist_m * margin_factor`.
    ///
    /// Units: meters
    pub margin_m: f64,

    /// The footprint inset by the full margin. Constrained positions are pulled towards this
    /// polygon's boundary.
    pub safe_zone: Polygon<f64>,

    /// The footprint inset by a fraction of the margin. Commands inside this polygon pass
    /// through unconstrained.
    pub danger_zone: Polygon<f64>,

    /// The highest height the spar may be commanded to, below the lowest rope anchor.
    ///
    /// Units: meters
    pub min_height_m: f64,

    /// The lowest height the spar may be commanded to.
    ///
    /// Units: meters
    pub min_allowed_height_m: f64
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl WorkspaceBounds {
    /// Compute the workspace bounds for the given rig.
    ///
    /// Pure function of the rig and parameters. The rig is expected to have been validated,
    /// degenerate insets fail soft by falling back to the footprint itself.
    pub fn compute(rig: &RigConfig, params: &Params) -> Self {
        let footprint = rig.footprint_polygon();

        // The centroid only fails for an empty polygon, which validation precludes, fall back
        // to the vertex mean rather than panicking.
        let centroid = footprint
            .centroid()
            .unwrap_or_else(|| vertex_mean(&footprint));

        let min_vertex_dist_m = ring_coords(&footprint)
            .iter()
            .filter_map(|c| norm(&[centroid.x(), centroid.y()], &[c.x, c.y]))
            .fold(f64::INFINITY, f64::min);

        let margin_m = min_vertex_dist_m * params.margin_factor;

        let safe_zone = inset_polygon(&footprint, margin_m);
        let danger_zone = inset_polygon(&footprint, margin_m * params.danger_zone_factor);

        let min_height_m = rig.min_mast_height().unwrap_or(0.0) - params.height_clearance_m;

        Self {
            footprint,
            centroid,
            min_vertex_dist_m,
            margin_m,
            safe_zone,
            danger_zone,
            min_height_m,
            min_allowed_height_m: params.min_allowed_height_m
        }
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Inset a polygon's exterior ring inwards by the given distance using sharp (miter) joins.
///
/// The result preserves the input's winding order. An inset larger than the polygon's inradius
/// inverts the ring, in that case (or for any other degeneracy) the original polygon is
/// returned unchanged and the caller gets an un-inset boundary rather than garbage geometry.
pub fn inset_polygon(polygon: &Polygon<f64>, dist_m: f64) -> Polygon<f64> {
    let ring = ring_coords(polygon);
    let n = ring.len();

    if n < 3 || !(dist_m > 0.0) || !dist_m.is_finite() {
        return polygon.clone();
    }

    // Interior lies to the left of travel for counter-clockwise rings, to the right otherwise
    let ccw = polygon.signed_area() >= 0.0;

    // Unit direction and inward normal of each edge
    let mut dirs: Vec<(f64, f64)> = Vec::with_capacity(n);
    let mut normals: Vec<(f64, f64)> = Vec::with_capacity(n);

    for i in 0..n {
        let p = ring[i];
        let q = ring[(i + 1) % n];
        let (ex, ey) = (q.x - p.x, q.y - p.y);
        let len = (ex * ex + ey * ey).sqrt();

        // A zero-length edge has no direction to offset along
        if len < f64::EPSILON {
            return polygon.clone();
        }

        let u = (ex / len, ey / len);
        dirs.push(u);
        normals.push(if ccw { (-u.1, u.0) } else { (u.1, -u.0) });
    }

    // Each inset vertex is the intersection of the two adjacent offset edge lines (the miter
    // join). Parallel neighbours just slide the shared vertex along the common normal.
    let mut inset: Vec<Coord<f64>> = Vec::with_capacity(n);

    for i in 0..n {
        let prev = (i + n - 1) % n;

        let p1 = (
            ring[prev].x + normals[prev].0 * dist_m,
            ring[prev].y + normals[prev].1 * dist_m
        );
        let p2 = (
            ring[i].x + normals[i].0 * dist_m,
            ring[i].y + normals[i].1 * dist_m
        );

        let u1 = dirs[prev];
        let u2 = dirs[i];
        let cross = u1.0 * u2.1 - u1.1 * u2.0;

        let vertex = if cross.abs() < PARALLEL_EDGE_EPSILON {
            p2
        } else {
            let t = ((p2.0 - p1.0) * u2.1 - (p2.1 - p1.1) * u2.0) / cross;
            (p1.0 + u1.0 * t, p1.1 + u1.1 * t)
        };

        if !(vertex.0.is_finite() && vertex.1.is_finite()) {
            return polygon.clone();
        }

        inset.push(coord! { x: vertex.0, y: vertex.1 });
    }

    let result = Polygon::new(LineString::from(inset), vec![]);

    // An inset past the inradius flips the ring's orientation or collapses it entirely
    let area = result.signed_area();
    if !area.is_finite() || area.abs() < DEGENERATE_AREA_M2 || (area >= 0.0) != ccw {
        return polygon.clone();
    }

    result
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the exterior ring coordinates of a polygon without the closing duplicate.
fn ring_coords(polygon: &Polygon<f64>) -> Vec<Coord<f64>> {
    let mut coords = polygon.exterior().0.clone();

    if coords.len() > 1 && coords.first() == coords.last() {
        coords.pop();
    }

    coords
}

/// Mean of a polygon's exterior vertices, used as a centroid fallback.
fn vertex_mean(polygon: &Polygon<f64>) -> Point<f64> {
    let coords = ring_coords(polygon);

    if coords.is_empty() {
        return Point::new(0.0, 0.0);
    }

    let n = coords.len() as f64;
    let sum = coords
        .iter()
        .fold((0.0, 0.0), |acc, c| (acc.0 + c.x, acc.1 + c.y));

    Point::new(sum.0 / n, sum.1 / n)
}

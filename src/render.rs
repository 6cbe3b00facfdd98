//! CPU-side geometry building.
//!
//! Each frame the scheduler turns the grid into two vertex streams: one
//! instance per point marker, and a line list connecting index-adjacent
//! neighbors. Building happens on the CPU so the guard against wrap-induced
//! long edges is testable without a GPU; `gpu` only uploads and draws.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::grid::PointGrid;

/// Per-instance data for one point marker.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MarkerInstance {
    /// Marker center in surface pixels.
    pub position: Vec2,
}

/// One endpoint of a connection line segment.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    /// Endpoint in surface pixels.
    pub position: Vec2,
}

/// Collect a marker instance for every point, reusing `out`.
pub fn marker_instances(grid: &PointGrid, out: &mut Vec<MarkerInstance>) {
    out.clear();
    out.extend(grid.points().iter().map(|p| MarkerInstance {
        position: p.position,
    }));
}

/// Collect connection line segments into `out` as a line list (two vertices
/// per segment).
///
/// Connectivity comes from grid index adjacency only: each point tries its
/// right neighbor `(i+1, j)` and its down neighbor `(i, j+1)`. A segment is
/// emitted only when the drawn positions sit within `2*gap` of each other on
/// both axes. Without that guard, the frame in which a point wraps would
/// draw a spurious line across the whole surface.
pub fn line_vertices(grid: &PointGrid, out: &mut Vec<LineVertex>) {
    out.clear();
    let limit = 2.0 * grid.gap();
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let a = grid.point(col, row).position;
            if col + 1 < grid.cols() {
                push_if_near(a, grid.point(col + 1, row).position, limit, out);
            }
            if row + 1 < grid.rows() {
                push_if_near(a, grid.point(col, row + 1).position, limit, out);
            }
        }
    }
}

/// Upper bound on line vertices a grid can produce: two segments per point,
/// two vertices each. Used to size the GPU buffer once per grid.
pub fn max_line_vertices(grid: &PointGrid) -> usize {
    grid.len() * 4
}

#[inline]
fn push_if_near(a: Vec2, b: Vec2, limit: f32, out: &mut Vec<LineVertex>) {
    let d = (b - a).abs();
    if d.x < limit && d.y < limit {
        out.push(LineVertex { position: a });
        out.push(LineVertex { position: b });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;

    fn resting_grid() -> (PointGrid, GridConfig) {
        let config = GridConfig::new().with_gap(50.0);
        (PointGrid::new(400.0, 300.0, &config).unwrap(), config)
    }

    #[test]
    fn test_marker_per_point() {
        let (grid, _) = resting_grid();
        let mut markers = Vec::new();
        marker_instances(&grid, &mut markers);

        assert_eq!(markers.len(), grid.len());
        assert_eq!(markers[0].position, grid.point(0, 0).position);
    }

    #[test]
    fn test_resting_grid_connects_all_neighbors() {
        let (grid, _) = resting_grid();
        let mut lines = Vec::new();
        line_vertices(&grid, &mut lines);

        let cols = grid.cols();
        let rows = grid.rows();
        let expected_segments = (cols - 1) * rows + cols * (rows - 1);
        assert_eq!(lines.len(), expected_segments * 2);
    }

    #[test]
    fn test_segments_never_span_two_gaps() {
        let (mut grid, _) = resting_grid();
        // Teleport one column the way a wrap does, leaving its neighbors in
        // place; the guard must drop the segments that now span the surface.
        let extent = grid.extent_x();
        let cols = grid.cols();
        for row in 0..grid.rows() {
            let p = grid.point_mut(cols - 1, row);
            p.position.x -= extent;
            p.origin.x -= extent;
        }

        let mut lines = Vec::new();
        line_vertices(&grid, &mut lines);

        let limit = 2.0 * grid.gap();
        for pair in lines.chunks_exact(2) {
            let d = (pair[1].position - pair[0].position).abs();
            assert!(d.x < limit && d.y < limit);
        }
        // The wrapped column lost its left-neighbor segments.
        let full = ((cols - 1) * grid.rows()) + cols * (grid.rows() - 1);
        assert!(lines.len() < full * 2);
    }

    #[test]
    fn test_buffers_are_reused() {
        let (grid, _) = resting_grid();
        let mut lines = Vec::with_capacity(max_line_vertices(&grid));
        line_vertices(&grid, &mut lines);
        let first = lines.len();
        line_vertices(&grid, &mut lines);

        assert_eq!(lines.len(), first);
        assert!(lines.len() <= max_line_vertices(&grid));
    }
}

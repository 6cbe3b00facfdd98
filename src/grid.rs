//! The point lattice data model.
//!
//! A [`PointGrid`] is a rectangular collection of [`GridPoint`]s indexed by
//! `(column, row)`. Each point carries its drawn `position`, its `velocity`,
//! and the `origin` it is spring-attached to. The grid is sized from the
//! viewport plus an off-screen margin so the toroidal wrap in
//! [`physics::step`](crate::physics::step) never exposes a visible edge.
//!
//! Grids are rebuilt wholesale on every resize; indices are stable only for
//! the lifetime of one grid.

use glam::Vec2;

use crate::config::GridConfig;

/// Upper bound on `cols * rows`. A pathologically small `gap` relative to the
/// viewport is clamped to this instead of allocating without bound.
pub const MAX_POINTS: usize = 65_536;

/// One spring-attached point-mass in the lattice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    /// Current drawn location, in pixels.
    pub position: Vec2,
    /// Current drift/impulse velocity.
    pub velocity: Vec2,
    /// The resting location this point is pulled back toward. Drifts every
    /// frame regardless of pointer interaction.
    pub origin: Vec2,
}

/// A rectangular lattice of point-masses covering the viewport plus margin.
#[derive(Debug, Clone)]
pub struct PointGrid {
    points: Vec<GridPoint>,
    cols: usize,
    rows: usize,
    width: f32,
    height: f32,
    gap: f32,
}

impl PointGrid {
    /// Build a grid for a `width` x `height` viewport.
    ///
    /// Point `(i, j)` rests at `(-2*gap + i*gap, -2*gap + j*gap)` with
    /// `position == origin` and zero velocity. Returns `None` for a
    /// degenerate viewport (either dimension <= 0), so callers can keep a
    /// previous grid and retry on the next valid resize.
    pub fn new(width: f32, height: f32, config: &GridConfig) -> Option<Self> {
        if width <= 0.0 || height <= 0.0 {
            return None;
        }

        let gap = config.gap;
        let mut cols = (width / gap).ceil() as usize + config.margin;
        let mut rows = (height / gap).ceil() as usize + config.margin;

        if cols * rows > MAX_POINTS {
            // Silent clamp: shrink both axes proportionally so the product
            // stays under the cap.
            let scale = (MAX_POINTS as f32 / (cols * rows) as f32).sqrt();
            cols = ((cols as f32 * scale) as usize).max(1);
            rows = ((rows as f32 * scale) as usize).max(1);
            log::debug!(
                "point cap reached for {width}x{height} at gap {gap}, clamped to {cols}x{rows}"
            );
        }

        let start = Vec2::splat(-2.0 * gap);
        let mut points = Vec::with_capacity(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                let origin = start + Vec2::new(col as f32 * gap, row as f32 * gap);
                points.push(GridPoint {
                    position: origin,
                    velocity: Vec2::ZERO,
                    origin,
                });
            }
        }

        Some(Self {
            points,
            cols,
            rows,
            width,
            height,
            gap,
        })
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Total number of points (`cols * rows`).
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the grid holds no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Viewport width the grid was built for, in pixels.
    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Viewport height the grid was built for, in pixels.
    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Resting spacing between points, in pixels.
    #[inline]
    pub fn gap(&self) -> f32 {
        self.gap
    }

    /// Full horizontal extent of the lattice (`cols * gap`), the wrap
    /// teleport distance along x.
    #[inline]
    pub fn extent_x(&self) -> f32 {
        self.cols as f32 * self.gap
    }

    /// Full vertical extent of the lattice (`rows * gap`), the wrap teleport
    /// distance along y.
    #[inline]
    pub fn extent_y(&self) -> f32 {
        self.rows as f32 * self.gap
    }

    /// The point at `(col, row)`. Panics if either index is out of range.
    #[inline]
    pub fn point(&self, col: usize, row: usize) -> &GridPoint {
        &self.points[row * self.cols + col]
    }

    /// Mutable access to the point at `(col, row)`.
    #[inline]
    pub fn point_mut(&mut self, col: usize, row: usize) -> &mut GridPoint {
        &mut self.points[row * self.cols + col]
    }

    /// All points in row-major order.
    #[inline]
    pub fn points(&self) -> &[GridPoint] {
        &self.points
    }

    /// Mutable access to all points in row-major order.
    #[inline]
    pub fn points_mut(&mut self) -> &mut [GridPoint] {
        &mut self.points
    }
}

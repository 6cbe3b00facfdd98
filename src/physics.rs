//! Force application and the per-frame integration step.
//!
//! [`step`] advances every point one frame, in a fixed order:
//!
//! 1. drift the origin by `speed` on both axes;
//! 2. toroidal wrap, per axis: once the origin exceeds the viewport bound
//!    plus one `gap`, teleport both origin and position back by the full
//!    lattice extent so the relative spring offset is untouched;
//! 3. pointer repulsion (linear falloff inside `max_dist`);
//! 4. spring pull toward the origin;
//! 5. friction on the combined velocity;
//! 6. integrate position.
//!
//! Damping acts on the combined velocity, not on spring and repulsion
//! separately; reordering changes the settling behavior. The step is fully
//! deterministic: no randomness, no wall-clock reads.

use glam::Vec2;

use crate::config::GridConfig;
use crate::grid::PointGrid;

/// Linear repulsion falloff for a pointer at distance `d`.
///
/// Returns `(max_dist - d) / max_dist`, which is `1.0` at contact and
/// approaches `0.0` at the interaction radius. Callers are expected to have
/// already checked `d < max_dist`.
#[inline]
pub fn falloff(d: f32, max_dist: f32) -> f32 {
    (max_dist - d) / max_dist
}

/// Velocity impulse the pointer exerts on a point at `position`.
///
/// Points are repelled, never attracted: the impulse is directed from the
/// pointer toward the point. Returns `None` outside the interaction radius.
/// At zero distance the falloff is exactly `1.0` and the degenerate
/// direction resolves to `+x`, keeping the step deterministic.
pub fn repulsion_impulse(pointer: Vec2, position: Vec2, config: &GridConfig) -> Option<Vec2> {
    let delta = position - pointer;
    let d = delta.length();
    if d >= config.max_dist {
        return None;
    }
    let direction = if d > f32::EPSILON { delta / d } else { Vec2::X };
    Some(direction * falloff(d, config.max_dist) * config.push_strength)
}

/// Advance every point in the grid by one frame.
///
/// `pointer` is the last-known cursor sample in surface pixels, or `None` if
/// no sample has been observed; without a sample the field exerts no force.
pub fn step(grid: &mut PointGrid, pointer: Option<Vec2>, config: &GridConfig) {
    let gap = grid.gap();
    let bound_x = grid.width() + gap;
    let bound_y = grid.height() + gap;
    let extent_x = grid.extent_x();
    let extent_y = grid.extent_y();
    let drift = Vec2::splat(config.speed);

    for p in grid.points_mut() {
        p.origin += drift;

        // Wrap is atomic per axis: origin and position move together or not
        // at all, so the spring offset survives the teleport exactly.
        if p.origin.x > bound_x {
            p.origin.x -= extent_x;
            p.position.x -= extent_x;
        }
        if p.origin.y > bound_y {
            p.origin.y -= extent_y;
            p.position.y -= extent_y;
        }

        if let Some(pointer) = pointer {
            if let Some(impulse) = repulsion_impulse(pointer, p.position, config) {
                p.velocity += impulse;
            }
        }

        p.velocity += (p.origin - p.position) * config.spring_constant;
        p.velocity *= config.friction;
        p.position += p.velocity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_grid(config: &GridConfig) -> PointGrid {
        PointGrid::new(400.0, 300.0, config).unwrap()
    }

    #[test]
    fn test_falloff_is_one_at_contact() {
        assert_eq!(falloff(0.0, 200.0), 1.0);
    }

    #[test]
    fn test_falloff_is_linear() {
        assert_eq!(falloff(100.0, 200.0), 0.5);
        assert_eq!(falloff(150.0, 200.0), 0.25);
    }

    #[test]
    fn test_repulsion_outside_radius_is_none() {
        let config = GridConfig::new().with_max_dist(200.0);
        let pointer = Vec2::ZERO;
        assert_eq!(
            repulsion_impulse(pointer, Vec2::new(200.0, 0.0), &config),
            None
        );
        assert_eq!(
            repulsion_impulse(pointer, Vec2::new(500.0, 0.0), &config),
            None
        );
    }

    #[test]
    fn test_repulsion_points_away_from_pointer() {
        let config = GridConfig::new()
            .with_max_dist(200.0)
            .with_push_strength(2.0);
        let impulse =
            repulsion_impulse(Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0), &config).unwrap();
        assert!(impulse.x > 0.0);
        assert_eq!(impulse.y, 0.0);
        assert_eq!(impulse.x, 0.5 * 2.0);
    }

    #[test]
    fn test_repulsion_at_zero_distance_is_maximal() {
        let config = GridConfig::new()
            .with_max_dist(200.0)
            .with_push_strength(2.0);
        let impulse = repulsion_impulse(Vec2::new(50.0, 50.0), Vec2::new(50.0, 50.0), &config)
            .unwrap();
        assert_eq!(impulse, Vec2::new(2.0, 0.0));
        assert_eq!(impulse.length(), config.push_strength);
    }

    #[test]
    fn test_spring_then_friction_then_integrate() {
        let config = GridConfig::new()
            .with_speed(0.0)
            .with_spring_constant(0.08)
            .with_friction(0.90);
        let mut grid = small_grid(&config);

        let origin = grid.point(2, 2).origin;
        grid.point_mut(2, 2).position = origin + Vec2::new(10.0, 0.0);

        step(&mut grid, None, &config);

        let p = grid.point(2, 2);
        // Damping applies to the combined velocity, then position integrates.
        let expected_v = (Vec2::new(-10.0, 0.0) * 0.08) * 0.90;
        assert_eq!(p.velocity, expected_v);
        assert_eq!(p.position, origin + Vec2::new(10.0, 0.0) + expected_v);
    }

    #[test]
    fn test_drift_moves_every_origin() {
        let config = GridConfig::new().with_speed(0.5);
        let mut grid = small_grid(&config);
        let before: Vec<Vec2> = grid.points().iter().map(|p| p.origin).collect();

        step(&mut grid, None, &config);

        for (p, prev) in grid.points().iter().zip(before) {
            assert_eq!(p.origin, prev + Vec2::splat(0.5));
        }
    }

    #[test]
    fn test_wrap_preserves_spring_offset_exactly() {
        // 400x300 at gap 50 gives 12 cols; the rightmost origin sits at
        // x = 450, exactly on the wrap bound, so one drift of 5 crosses it.
        let config = GridConfig::new()
            .with_gap(50.0)
            .with_speed(5.0)
            .with_spring_constant(0.0);
        let mut grid = small_grid(&config);
        let last_col = grid.cols() - 1;

        let pre = *grid.point(last_col, 0);
        grid.point_mut(last_col, 0).position.x = pre.origin.x - 7.0;
        let extent = grid.extent_x();

        step(&mut grid, None, &config);

        let post = grid.point(last_col, 0);
        assert_eq!(post.origin.x, pre.origin.x + 5.0 - extent);
        assert_eq!(post.position.x, (pre.origin.x - 7.0) - extent);
        // Relative offset after the drift is unchanged by the teleport.
        assert_eq!(
            post.origin.x - post.position.x,
            (pre.origin.x + 5.0 - extent) - ((pre.origin.x - 7.0) - extent)
        );
    }

    #[test]
    fn test_wrap_y_axis_is_symmetric() {
        let config = GridConfig::new()
            .with_gap(50.0)
            .with_speed(5.0)
            .with_spring_constant(0.0);
        let mut grid = small_grid(&config);
        let last_row = grid.rows() - 1;

        let pre = *grid.point(0, last_row);
        let extent = grid.extent_y();

        step(&mut grid, None, &config);

        let post = grid.point(0, last_row);
        assert_eq!(post.origin.y, pre.origin.y + 5.0 - extent);
        // Position does not drift; the teleport is its only displacement.
        assert_eq!(post.position.y, pre.position.y - extent);
    }

    #[test]
    fn test_no_wrap_inside_bounds() {
        let config = GridConfig::new().with_gap(50.0).with_speed(0.1);
        let mut grid = small_grid(&config);
        let pre = *grid.point(0, 0);

        step(&mut grid, None, &config);

        let post = grid.point(0, 0);
        assert_eq!(post.origin.x, pre.origin.x + 0.1);
        assert_eq!(post.origin.y, pre.origin.y + 0.1);
    }

    #[test]
    fn test_no_pointer_sample_means_no_impulse() {
        let config = GridConfig::new().with_speed(0.0);
        let mut grid = small_grid(&config);

        step(&mut grid, None, &config);

        // position == origin and speed == 0, so nothing moves at all.
        for p in grid.points() {
            assert_eq!(p.velocity, Vec2::ZERO);
            assert_eq!(p.position, p.origin);
        }
    }

    #[test]
    fn test_pointer_contact_gets_largest_impulse() {
        let config = GridConfig::new()
            .with_speed(0.0)
            .with_max_dist(200.0)
            .with_push_strength(2.0);
        let mut grid = small_grid(&config);
        let target = grid.point(4, 4).position;

        step(&mut grid, Some(target), &config);

        let hit = grid.point(4, 4).velocity;
        assert_eq!(hit, Vec2::new(2.0 * config.friction, 0.0));
        for (i, p) in grid.points().iter().enumerate() {
            if i != 4 * grid.cols() + 4 {
                assert!(p.velocity.length() <= hit.length());
            }
        }
    }
}

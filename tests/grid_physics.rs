//! Integration tests for the simulation core.
//!
//! These exercise whole-grid behavior over many frames: settling into the
//! critically-damped rest state, seamlessness across toroidal wrap events,
//! the connection-line guard, and bitwise determinism under a fixed pointer
//! input sequence.

use driftgrid::{physics, render, GridConfig, PointGrid, Vec2};

// ============================================================================
// Settling
// ============================================================================

#[test]
fn test_displaced_points_settle_back_to_origin() {
    let config = GridConfig::new()
        .with_gap(50.0)
        .with_speed(0.0)
        .with_spring_constant(0.08)
        .with_friction(0.90);
    let mut grid = PointGrid::new(800.0, 600.0, &config).unwrap();

    grid.point_mut(5, 5).position += Vec2::new(40.0, -25.0);
    grid.point_mut(10, 3).velocity = Vec2::new(6.0, 6.0);

    for _ in 0..300 {
        physics::step(&mut grid, None, &config);
    }

    for p in grid.points() {
        assert!(
            (p.position - p.origin).length() < 0.01,
            "point did not settle: position {:?} origin {:?}",
            p.position,
            p.origin
        );
    }
}

#[test]
fn test_field_at_rest_stays_at_rest() {
    let config = GridConfig::new().with_speed(0.0);
    let mut grid = PointGrid::new(640.0, 480.0, &config).unwrap();
    let before: Vec<Vec2> = grid.points().iter().map(|p| p.position).collect();

    for _ in 0..50 {
        physics::step(&mut grid, None, &config);
    }

    for (p, prev) in grid.points().iter().zip(before) {
        assert_eq!(p.position, prev);
    }
}

// ============================================================================
// Toroidal wrap
// ============================================================================

#[test]
fn test_origins_stay_bounded_across_many_wraps() {
    let config = GridConfig::new().with_gap(50.0).with_speed(5.0);
    let mut grid = PointGrid::new(400.0, 300.0, &config).unwrap();
    let bound_x = grid.width() + grid.gap();
    let bound_y = grid.height() + grid.gap();

    for _ in 0..500 {
        physics::step(&mut grid, None, &config);
        for p in grid.points() {
            assert!(p.origin.x <= bound_x && p.origin.y <= bound_y);
            assert!(p.origin.x > -grid.extent_x() && p.origin.y > -grid.extent_y());
        }
    }
}

#[test]
fn test_wrap_never_applies_partially() {
    // With the spring disabled and no pointer, position and origin can only
    // move together (drift affects origin alone, wrap affects both); the
    // offset must therefore grow by exactly `speed` per frame per axis.
    let config = GridConfig::new()
        .with_gap(50.0)
        .with_speed(5.0)
        .with_spring_constant(0.0);
    let mut grid = PointGrid::new(400.0, 300.0, &config).unwrap();

    for frame in 1..=200u32 {
        physics::step(&mut grid, None, &config);
        let expected = 5.0 * frame as f32;
        for p in grid.points() {
            assert_eq!(p.origin.x - p.position.x, expected);
            assert_eq!(p.origin.y - p.position.y, expected);
        }
    }
}

// ============================================================================
// Connection lines
// ============================================================================

#[test]
fn test_no_spurious_long_edges_across_wrap_events() {
    let config = GridConfig::new()
        .with_gap(50.0)
        .with_speed(5.0)
        .with_max_dist(200.0)
        .with_push_strength(1.5);
    let mut grid = PointGrid::new(400.0, 300.0, &config).unwrap();
    let limit = 2.0 * grid.gap();
    let center = Vec2::new(200.0, 150.0);

    let mut lines = Vec::with_capacity(render::max_line_vertices(&grid));
    for frame in 0..300 {
        let angle = frame as f32 * 0.05;
        let pointer = center + Vec2::new(angle.cos(), angle.sin()) * 100.0;
        physics::step(&mut grid, Some(pointer), &config);

        render::line_vertices(&grid, &mut lines);
        for pair in lines.chunks_exact(2) {
            let d = (pair[1].position - pair[0].position).abs();
            assert!(
                d.x < limit && d.y < limit,
                "segment spans {d:?} at frame {frame}"
            );
        }
    }
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_fixed_input_sequence_is_bitwise_reproducible() {
    let config = GridConfig::new().with_gap(50.0).with_speed(0.7);

    let run = || {
        let mut grid = PointGrid::new(400.0, 300.0, &config).unwrap();
        for frame in 0..200u32 {
            let pointer = Vec2::new((frame * 7 % 400) as f32, (frame * 13 % 300) as f32);
            physics::step(&mut grid, Some(pointer), &config);
        }
        grid.points()
            .iter()
            .map(|p| (p.position.x.to_bits(), p.position.y.to_bits()))
            .collect::<Vec<_>>()
    };

    assert_eq!(run(), run());
}

#[test]
fn test_reinitialization_is_reproducible() {
    // A resize rebuilds the grid through the same routine as startup; two
    // builds with the same inputs must be identical.
    let config = GridConfig::new().with_gap(35.0);
    let a = PointGrid::new(1024.0, 768.0, &config).unwrap();
    let b = PointGrid::new(1024.0, 768.0, &config).unwrap();

    assert_eq!(a.len(), b.len());
    for (pa, pb) in a.points().iter().zip(b.points()) {
        assert_eq!(pa, pb);
    }
}

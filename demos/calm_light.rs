//! A sparse, slowly settling lattice on the light theme.
//!
//! Run with: `cargo run --example calm_light`

use driftgrid::{Backdrop, GridConfig, Theme};

fn main() {
    env_logger::init();

    let config = GridConfig::new()
        .with_gap(64.0)
        .with_speed(0.25)
        .with_max_dist(160.0)
        .with_push_strength(1.2)
        .with_spring_constant(0.05)
        .with_friction(0.92)
        .with_theme(Theme::Light);

    Backdrop::with_config(config).run().unwrap();
}

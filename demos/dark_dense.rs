//! A dense, fast-drifting lattice on the dark theme.
//!
//! Run with: `cargo run --example dark_dense`

use driftgrid::{Backdrop, GridConfig, Theme};

fn main() {
    env_logger::init();

    let config = GridConfig::new()
        .with_gap(28.0)
        .with_speed(0.9)
        .with_max_dist(240.0)
        .with_push_strength(3.0)
        .with_theme(Theme::Dark);

    Backdrop::with_config(config).run().unwrap();
}

use std::error::Error;

use tabled::{
    builder::Builder,
    settings::{Panel, Style},
};

use crate::input::classifier::Scheme;

pub fn handle_classify(scheme: Scheme, x: f64, y: f64) {
    let region = scheme.classify(x, y);
    println!("{region}");
}

pub fn handle_grid(scheme: Scheme, size: usize) -> Result<(), Box<dyn Error + Send + Sync>> {
    if size == 0 {
        return Err("Grid size must be at least 1".into());
    }

    let coords = grid_coordinates(size);
    let mut builder = Builder::default();

    let mut header = vec!["y \\ x".to_string()];
    header.extend(coords.iter().map(|x| format!("{x:.2}")));
    builder.push_record(header);

    // Rows run from the top of the surface to the bottom
    for y in coords.iter().rev() {
        let mut row = vec![format!("{y:.2}")];
        row.extend(coords.iter().map(|x| scheme.classify(*x, *y).to_string()));
        builder.push_record(row);
    }

    let mut table = builder.build();
    table
        .with(Style::modern_rounded())
        .with(Panel::header(format!("{scheme} regions")));
    println!("{table}");

    Ok(())
}

/// Returns the centers of `size` equal cells spanning [-1, 1]
fn grid_coordinates(size: usize) -> Vec<f64> {
    let step = 2.0 / size as f64;
    (0..size)
        .map(|i| -1.0 + step * (i as f64 + 0.5))
        .collect()
}

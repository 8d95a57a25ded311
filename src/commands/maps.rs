use std::error::Error;
use std::fs;
use std::path::Path;

use colored::*;

use crate::coalitions::CoalitionRegistry;
use crate::maps::load_boundaries;
use crate::maps::render::{render_map, SeatResultsTable};

/// Join the seat-results table onto the boundary polygons and write one
/// interactive HTML map per configured coalition.
pub fn build_maps(
    config: &Path,
    seat_results: &Path,
    geojson: &Path,
    out_dir: &Path,
) -> Result<(), Box<dyn Error>> {
    let registry = CoalitionRegistry::load(config)?;
    let table = SeatResultsTable::load(seat_results)?;
    let boundaries = load_boundaries(geojson)
        .map_err(|e| format!("boundaries {}: {}", geojson.display(), e))?;

    fs::create_dir_all(out_dir)?;
    let mut built = 0usize;
    for def in registry.coalitions() {
        if !table.has_coalition(&def.key) {
            println!(
                "⚠️  Skipping {}: no columns in the seat results table",
                def.key.yellow()
            );
            continue;
        }
        let page = render_map(&boundaries, &table, def)?;
        let out_path = out_dir.join(format!("{}.html", def.key));
        fs::write(&out_path, page)?;
        println!(
            "✅ Wrote map for {} to {}",
            def.display_name.cyan(),
            out_path.display().to_string().green()
        );
        built += 1;
    }
    println!("🗺️  Map generation complete ({} maps)", built);
    Ok(())
}

use std::collections::HashSet;
use std::error::Error;
use std::fs;
use std::path::Path;
use std::time::Duration;

use colored::*;
use itertools::Itertools;

use crate::coalitions::CoalitionRegistry;
use crate::fetch;
use crate::formats::tbs;
use crate::reports::aggregate::aggregate;
use crate::reports::tables;
use crate::util::group_digits;

const FETCH_TIMEOUT: Duration = Duration::from_secs(20);
const TOP_PARTIES_SHOWN: usize = 15;

/// Fetch (or load) the portal page, extract and aggregate the results,
/// and write the three CSV tables. Nothing is written until aggregation
/// has fully succeeded.
#[allow(clippy::too_many_arguments)]
pub fn scrape(
    config: &Path,
    url: Option<&str>,
    local_html: &Path,
    out_seat_results: &Path,
    out_party_totals: &Path,
    out_party_by_seat: &Path,
    save_html: bool,
    payload_key: &str,
) -> Result<(), Box<dyn Error>> {
    let registry = CoalitionRegistry::load(config)?;
    println!(
        "🏳️  {} coalitions configured: {}",
        registry.len(),
        registry
            .coalitions()
            .iter()
            .map(|def| def.key.as_str())
            .join(", ")
            .cyan()
    );

    let document = load_document(url, local_html, save_html)?;

    let extraction = tbs::extract(&document, payload_key)?;
    if extraction.skipped > 0 {
        println!(
            "⚠️  Skipped {} malformed candidate entries",
            extraction.skipped.to_string().yellow()
        );
    }
    let seats: HashSet<&str> = extraction
        .records
        .iter()
        .map(|r| r.seat_id.as_str())
        .collect();
    println!(
        "📊 Extracted {} vote records across {} seats",
        extraction.records.len().to_string().bright_green(),
        seats.len()
    );

    let result = aggregate(&extraction.records, &registry);
    tables::write_seat_results(out_seat_results, &result.seat_results, &registry)?;
    println!(
        "✅ Wrote seat results to {}",
        out_seat_results.display().to_string().green()
    );
    tables::write_party_totals(out_party_totals, &result)?;
    println!(
        "✅ Wrote party totals to {}",
        out_party_totals.display().to_string().green()
    );
    tables::write_party_by_seat(out_party_by_seat, &result)?;
    println!(
        "✅ Wrote party-by-seat table to {}",
        out_party_by_seat.display().to_string().green()
    );

    println!("🏆 Top parties by national votes:");
    for row in result.party_totals.iter().take(TOP_PARTIES_SHOWN) {
        println!("   {:>12}  {}", group_digits(row.votes), row.party);
    }
    Ok(())
}

/// Try the live portal first, then the saved snapshot. The snapshot is
/// read leniently; upstream pages are not always clean UTF-8.
fn load_document(
    url: Option<&str>,
    local_html: &Path,
    save_html: bool,
) -> Result<String, Box<dyn Error>> {
    if let Some(url) = url {
        println!("🌐 Fetching {} ...", url.cyan());
        if let Some(body) = fetch::fetch_document(url, FETCH_TIMEOUT) {
            println!("✅ Downloaded {} bytes", group_digits(body.len() as u64));
            if save_html {
                let copy = fetch::downloaded_copy_path(local_html);
                if let Some(dir) = copy.parent() {
                    if !dir.as_os_str().is_empty() {
                        fs::create_dir_all(dir)?;
                    }
                }
                fs::write(&copy, &body)?;
                println!("💾 Saved downloaded page to {}", copy.display());
            }
            return Ok(body);
        }
        println!(
            "⚠️  Falling back to local snapshot {}",
            local_html.display().to_string().yellow()
        );
    }
    if local_html.exists() {
        let bytes = fs::read(local_html)
            .map_err(|e| format!("failed to read snapshot {}: {}", local_html.display(), e))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    } else {
        Err(format!(
            "could not download the portal page and no local snapshot exists at {}",
            local_html.display()
        )
        .into())
    }
}

//! CSV writers for the three derived tables. Column sets are stable:
//! downstream map rendering and any spreadsheet work key on them.

use std::fs;
use std::path::Path;

use super::{AggregateTables, ReportResult, SeatResult};
use crate::coalitions::CoalitionRegistry;

/// Label used in the party-totals table for parties outside every
/// configured coalition.
pub const UNCLASSIFIED: &str = "unclassified";

fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir),
        _ => Ok(()),
    }
}

fn number_field(n: Option<u32>) -> String {
    n.map(|n| n.to_string()).unwrap_or_default()
}

/// Seat results: one row per constituency with totals, then a votes and
/// a share column per coalition (registry order), then winner metadata.
pub fn write_seat_results(
    path: &Path,
    rows: &[SeatResult],
    registry: &CoalitionRegistry,
) -> ReportResult<()> {
    ensure_parent_dir(path)?;
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header = vec![
        "seat_id".to_string(),
        "seat_number".to_string(),
        "seat_name".to_string(),
        "total_votes".to_string(),
    ];
    for def in registry.coalitions() {
        header.push(format!("{}_votes", def.key));
        header.push(format!("{}_share", def.key));
    }
    header.extend(
        ["winning_coalition", "tie", "top_candidates", "top_parties"]
            .map(str::to_string),
    );
    wtr.write_record(&header)?;

    for row in rows {
        let mut record = vec![
            row.seat_id.clone(),
            number_field(row.seat_number),
            row.seat_name.clone(),
            row.total_votes.to_string(),
        ];
        for tally in &row.coalitions {
            record.push(tally.votes.to_string());
            record.push(tally.share.to_string());
        }
        record.push(row.winning_coalition.clone().unwrap_or_default());
        record.push(row.tie.to_string());
        record.push(row.top_candidates.clone());
        record.push(row.top_parties.clone());
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_party_totals(path: &Path, tables: &AggregateTables) -> ReportResult<()> {
    ensure_parent_dir(path)?;
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["party", "votes", "coalition"])?;
    for row in &tables.party_totals {
        wtr.write_record(&[
            row.party.clone(),
            row.votes.to_string(),
            row.coalition
                .clone()
                .unwrap_or_else(|| UNCLASSIFIED.to_string()),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_party_by_seat(path: &Path, tables: &AggregateTables) -> ReportResult<()> {
    ensure_parent_dir(path)?;
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["seat_id", "seat_number", "seat_name", "party", "votes"])?;
    for row in &tables.party_by_seat {
        wtr.write_record(&[
            row.seat_id.clone(),
            number_field(row.seat_number),
            row.seat_name.clone(),
            row.party.clone(),
            row.votes.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

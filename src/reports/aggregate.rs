//! The aggregation core: vote records in, the three derived tables out.
//!
//! Everything here is deterministic. Seats are ordered by seat number,
//! parties by votes (descending) with the name as tie-break, so a rerun
//! over identical input reproduces the tables byte for byte.

use std::collections::BTreeMap;

use itertools::Itertools;

use super::{AggregateTables, CoalitionTally, PartyBySeat, PartyTotal, SeatResult};
use crate::coalitions::CoalitionRegistry;
use crate::model::VoteRecord;

#[derive(Default)]
struct SeatAcc {
    number: Option<u32>,
    name: String,
    /// Votes summed per party across that party's candidates.
    party_votes: BTreeMap<String, u64>,
    /// (votes, candidate, party) for the top-three summaries.
    candidates: Vec<(u64, String, String)>,
}

/// Aggregate extracted records against the configured coalitions.
/// Empty input is a valid (all-empty) result, not an error.
pub fn aggregate(records: &[VoteRecord], registry: &CoalitionRegistry) -> AggregateTables {
    let mut seats: BTreeMap<String, SeatAcc> = BTreeMap::new();
    for record in records {
        let acc = seats.entry(record.seat_id.clone()).or_default();
        // First-seen metadata wins; the payload repeats it per record.
        if acc.number.is_none() {
            acc.number = record.seat_number;
        }
        if acc.name.is_empty() {
            acc.name = record.seat_name.clone();
        }
        *acc.party_votes.entry(record.party.clone()).or_insert(0) += record.votes;
        acc.candidates
            .push((record.votes, record.candidate.clone(), record.party.clone()));
    }

    let mut ordered: Vec<(&String, &SeatAcc)> = seats.iter().collect();
    ordered.sort_by(|(a_id, a), (b_id, b)| {
        (a.number.unwrap_or(u32::MAX), a_id).cmp(&(b.number.unwrap_or(u32::MAX), b_id))
    });

    let mut seat_results = Vec::with_capacity(ordered.len());
    let mut party_by_seat = Vec::new();
    let mut national: BTreeMap<String, u64> = BTreeMap::new();

    for (seat_id, acc) in ordered {
        let total_votes: u64 = acc.party_votes.values().sum();

        let mut coalition_votes = vec![0u64; registry.len()];
        for (party, &votes) in &acc.party_votes {
            *national.entry(party.clone()).or_insert(0) += votes;
            if let Some(idx) = registry.classify_index(party) {
                coalition_votes[idx] += votes;
            }
        }

        let coalitions = registry
            .coalitions()
            .iter()
            .zip(&coalition_votes)
            .map(|(def, &votes)| CoalitionTally {
                key: def.key.clone(),
                votes,
                share: if total_votes == 0 {
                    0.0
                } else {
                    votes as f64 / total_votes as f64
                },
            })
            .collect();

        let (winning_coalition, tie) = winner(registry, &coalition_votes);
        let (top_candidates, top_parties) = top_three(&acc.candidates, total_votes);

        seat_results.push(SeatResult {
            seat_id: seat_id.clone(),
            seat_number: acc.number,
            seat_name: acc.name.clone(),
            total_votes,
            coalitions,
            winning_coalition,
            tie,
            top_candidates,
            top_parties,
        });

        let mut rows: Vec<(&String, &u64)> = acc.party_votes.iter().collect();
        rows.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (party, &votes) in rows {
            party_by_seat.push(PartyBySeat {
                seat_id: seat_id.clone(),
                seat_number: acc.number,
                seat_name: acc.name.clone(),
                party: party.clone(),
                votes,
            });
        }
    }

    let party_totals = national
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
        .map(|(party, votes)| {
            let coalition = registry.classify(&party).map(str::to_string);
            PartyTotal {
                party,
                votes,
                coalition,
            }
        })
        .collect();

    AggregateTables {
        seat_results,
        party_totals,
        party_by_seat,
    }
}

/// Argmax over coalition totals. On a shared maximum the coalition
/// configured first wins and the tie flag is raised.
fn winner(registry: &CoalitionRegistry, coalition_votes: &[u64]) -> (Option<String>, bool) {
    if registry.is_empty() {
        return (None, false);
    }
    let max = coalition_votes.iter().copied().max().unwrap_or(0);
    let winner_idx = coalition_votes
        .iter()
        .position(|&v| v == max)
        .unwrap_or(0);
    let tie = coalition_votes.iter().filter(|&&v| v == max).count() > 1;
    (
        Some(registry.coalitions()[winner_idx].key.clone()),
        tie,
    )
}

/// Summary strings for the three strongest candidates in a seat, as
/// "Name (Party) 41.2%" and "Party (41.2%)" lists. Empty for seats with
/// no turnout.
fn top_three(candidates: &[(u64, String, String)], total_votes: u64) -> (String, String) {
    if total_votes == 0 || candidates.is_empty() {
        return (String::new(), String::new());
    }
    let mut ranked = candidates.to_vec();
    ranked.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    let top = &ranked[..ranked.len().min(3)];
    let pct = |votes: u64| votes as f64 * 100.0 / total_votes as f64;
    let top_candidates = top
        .iter()
        .map(|(votes, name, party)| format!("{} ({}) {:.1}%", name, party, pct(*votes)))
        .join(", ");
    let top_parties = top
        .iter()
        .map(|(votes, _, party)| format!("{} ({:.1}%)", party, pct(*votes)))
        .join(", ");
    (top_candidates, top_parties)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coalitions::CoalitionDefinition;

    fn registry(defs: &[(&str, &[&str])]) -> CoalitionRegistry {
        CoalitionRegistry::from_definitions(
            defs.iter()
                .map(|(key, keywords)| CoalitionDefinition {
                    key: key.to_string(),
                    display_name: key.to_uppercase(),
                    keywords: keywords.iter().map(|s| s.to_string()).collect(),
                    color_scale: Vec::new(),
                })
                .collect(),
        )
        .unwrap()
    }

    fn record(seat: u32, party: &str, candidate: &str, votes: u64) -> VoteRecord {
        VoteRecord {
            seat_id: format!("seat-{}", seat),
            seat_number: Some(seat),
            seat_name: format!("Seat {}", seat),
            party: party.to_string(),
            candidate: candidate.to_string(),
            votes,
        }
    }

    fn tally<'a>(seat: &'a SeatResult, key: &str) -> &'a CoalitionTally {
        seat.coalitions.iter().find(|t| t.key == key).unwrap()
    }

    #[test]
    fn empty_input_yields_empty_tables() {
        let registry = registry(&[("bnp", &["bnp"])]);
        let tables = aggregate(&[], &registry);
        assert!(tables.seat_results.is_empty());
        assert!(tables.party_totals.is_empty());
        assert!(tables.party_by_seat.is_empty());
    }

    #[test]
    fn unclassified_votes_dilute_coalition_shares() {
        let registry = registry(&[("bnp", &["bnp"])]);
        let records = vec![
            record(1, "BNP", "A", 600),
            record(1, "Independent", "B", 400),
        ];
        let tables = aggregate(&records, &registry);
        let seat = &tables.seat_results[0];
        assert_eq!(seat.total_votes, 1000);
        let bnp = tally(seat, "bnp");
        assert_eq!(bnp.votes, 600);
        assert!((bnp.share - 0.6).abs() < 1e-12);
    }

    #[test]
    fn coalition_votes_never_exceed_seat_total() {
        let registry = registry(&[("bnp", &["bnp"]), ("jamaat", &["jamaat"])]);
        let records = vec![
            record(1, "BNP", "A", 300),
            record(1, "Jamaat-e-Islami", "B", 250),
            record(1, "Unaligned Front", "C", 120),
        ];
        let tables = aggregate(&records, &registry);
        let seat = &tables.seat_results[0];
        let classified: u64 = seat.coalitions.iter().map(|t| t.votes).sum();
        assert!(classified <= seat.total_votes);
        let share_sum: f64 = seat.coalitions.iter().map(|t| t.share).sum();
        assert!(share_sum <= 1.0);
    }

    #[test]
    fn fully_classified_seat_has_shares_summing_to_one() {
        let registry = registry(&[("bnp", &["bnp"]), ("jamaat", &["jamaat"])]);
        let records = vec![
            record(1, "BNP", "A", 750),
            record(1, "Jamaat-e-Islami", "B", 250),
        ];
        let tables = aggregate(&records, &registry);
        let seat = &tables.seat_results[0];
        let classified: u64 = seat.coalitions.iter().map(|t| t.votes).sum();
        assert_eq!(classified, seat.total_votes);
        let share_sum: f64 = seat.coalitions.iter().map(|t| t.share).sum();
        assert!((share_sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn exact_tie_goes_to_first_configured_coalition_with_flag() {
        let registry = registry(&[("bnp", &["bnp"]), ("ndm", &["ndm"])]);
        let records = vec![record(1, "BNP", "A", 500), record(1, "NDM", "B", 500)];
        let tables = aggregate(&records, &registry);
        let seat = &tables.seat_results[0];
        assert_eq!(seat.total_votes, 1000);
        assert_eq!(seat.winning_coalition.as_deref(), Some("bnp"));
        assert!(seat.tie);
        assert!((tally(seat, "bnp").share - 0.5).abs() < 1e-12);
        assert!((tally(seat, "ndm").share - 0.5).abs() < 1e-12);
    }

    #[test]
    fn clear_winner_has_no_tie_flag() {
        let registry = registry(&[("bnp", &["bnp"]), ("ndm", &["ndm"])]);
        let records = vec![record(1, "BNP", "A", 501), record(1, "NDM", "B", 499)];
        let tables = aggregate(&records, &registry);
        let seat = &tables.seat_results[0];
        assert_eq!(seat.winning_coalition.as_deref(), Some("bnp"));
        assert!(!seat.tie);
    }

    #[test]
    fn zero_turnout_seat_has_zero_shares() {
        let registry = registry(&[("bnp", &["bnp"]), ("ndm", &["ndm"])]);
        let records = vec![record(7, "BNP", "A", 0), record(7, "NDM", "B", 0)];
        let tables = aggregate(&records, &registry);
        let seat = &tables.seat_results[0];
        assert_eq!(seat.total_votes, 0);
        for t in &seat.coalitions {
            assert_eq!(t.share, 0.0);
        }
        assert!(seat.top_candidates.is_empty());
    }

    #[test]
    fn votes_are_summed_across_candidates_of_one_party() {
        let registry = registry(&[("bnp", &["bnp"])]);
        let records = vec![record(1, "BNP", "A", 100), record(1, "BNP", "B", 150)];
        let tables = aggregate(&records, &registry);
        assert_eq!(tables.party_by_seat.len(), 1);
        assert_eq!(tables.party_by_seat[0].votes, 250);
        assert_eq!(tally(&tables.seat_results[0], "bnp").votes, 250);
    }

    #[test]
    fn national_totals_span_seats_and_carry_classification() {
        let registry = registry(&[("bnp", &["bnp"])]);
        let records = vec![
            record(1, "BNP", "A", 100),
            record(2, "BNP", "C", 200),
            record(2, "Independent", "D", 50),
        ];
        let tables = aggregate(&records, &registry);
        assert_eq!(tables.party_totals.len(), 2);
        // Sorted by national votes, descending.
        assert_eq!(tables.party_totals[0].party, "BNP");
        assert_eq!(tables.party_totals[0].votes, 300);
        assert_eq!(tables.party_totals[0].coalition.as_deref(), Some("bnp"));
        assert_eq!(tables.party_totals[1].coalition, None);
    }

    #[test]
    fn seats_are_ordered_by_seat_number() {
        let registry = registry(&[("bnp", &["bnp"])]);
        let records = vec![
            record(12, "BNP", "A", 10),
            record(3, "BNP", "B", 10),
            record(7, "BNP", "C", 10),
        ];
        let tables = aggregate(&records, &registry);
        let numbers: Vec<Option<u32>> = tables
            .seat_results
            .iter()
            .map(|s| s.seat_number)
            .collect();
        assert_eq!(numbers, vec![Some(3), Some(7), Some(12)]);
    }

    #[test]
    fn top_three_lists_strongest_candidates_with_percentages() {
        let registry = registry(&[("bnp", &["bnp"])]);
        let records = vec![
            record(1, "BNP", "Alpha", 500),
            record(1, "Jamaat", "Beta", 300),
            record(1, "NDM", "Gamma", 150),
            record(1, "Independent", "Delta", 50),
        ];
        let tables = aggregate(&records, &registry);
        let seat = &tables.seat_results[0];
        assert_eq!(
            seat.top_candidates,
            "Alpha (BNP) 50.0%, Beta (Jamaat) 30.0%, Gamma (NDM) 15.0%"
        );
        assert_eq!(
            seat.top_parties,
            "BNP (50.0%), Jamaat (30.0%), NDM (15.0%)"
        );
    }

    #[test]
    fn rerun_on_identical_input_is_identical() {
        let registry = registry(&[("bnp", &["bnp"]), ("ndm", &["ndm"])]);
        let records = vec![
            record(2, "BNP", "A", 321),
            record(2, "NDM", "B", 123),
            record(1, "Independent", "C", 55),
        ];
        let first = aggregate(&records, &registry);
        let second = aggregate(&records, &registry);
        assert_eq!(first.seat_results, second.seat_results);
        assert_eq!(first.party_totals, second.party_totals);
        assert_eq!(first.party_by_seat, second.party_by_seat);
    }
}

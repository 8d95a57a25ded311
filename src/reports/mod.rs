//! Derived result tables: per-seat coalition results, national party
//! totals, and the per-seat-per-party fact table.

pub mod aggregate;
pub mod tables;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ReportResult<T> = std::result::Result<T, ReportError>;

/// One coalition's numbers within one seat, in registry order.
#[derive(Debug, Clone, PartialEq)]
pub struct CoalitionTally {
    pub key: String,
    pub votes: u64,
    /// Votes over the seat total; 0.0 for a zero-turnout seat.
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeatResult {
    pub seat_id: String,
    pub seat_number: Option<u32>,
    pub seat_name: String,
    /// All votes cast in the seat, classified or not.
    pub total_votes: u64,
    pub coalitions: Vec<CoalitionTally>,
    /// Coalition with the most votes; ties go to the one configured
    /// first, with `tie` set so maps can style the seat distinctly.
    pub winning_coalition: Option<String>,
    pub tie: bool,
    pub top_candidates: String,
    pub top_parties: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartyTotal {
    pub party: String,
    pub votes: u64,
    /// None for parties matching no coalition's keywords.
    pub coalition: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartyBySeat {
    pub seat_id: String,
    pub seat_number: Option<u32>,
    pub seat_name: String,
    pub party: String,
    pub votes: u64,
}

#[derive(Debug, Default)]
pub struct AggregateTables {
    pub seat_results: Vec<SeatResult>,
    pub party_totals: Vec<PartyTotal>,
    pub party_by_seat: Vec<PartyBySeat>,
}

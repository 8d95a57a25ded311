/// One candidate's result in one constituency, as extracted from the
/// portal payload. Records are produced once per run and never mutated;
/// the aggregator consumes them and discards them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteRecord {
    /// Constituency key as it appears in the payload.
    pub seat_id: String,
    /// Numeric constituency number; joins to the `cst` property of the
    /// boundary polygons. Absent for seats the portal has not numbered.
    pub seat_number: Option<u32>,
    /// Human-readable constituency name.
    pub seat_name: String,
    /// Party name exactly as scraped.
    pub party: String,
    pub candidate: String,
    pub votes: u64,
}

//! Join one coalition's seat results onto boundary polygons and emit a
//! self-contained Leaflet page. Fill colors and tooltips are computed
//! here so the page needs no JavaScript beyond the map itself.

use std::collections::HashMap;
use std::path::Path;

use serde_json::{json, Value};

use super::{MapError, MapResult};
use crate::coalitions::CoalitionDefinition;
use crate::maps::color::scale_color;
use crate::util::group_digits;

const TEMPLATE: &str = include_str!("map_template.html");

/// Boundary features carry the seat number under this property, per the
/// constituency shapefile the portal maps are built from.
const SEAT_NUMBER_PROPERTY: &str = "cst";

/// The seat-results CSV, loaded leniently: rows keyed by header name so
/// per-coalition columns can be looked up dynamically.
#[derive(Debug)]
pub struct SeatResultsTable {
    headers: Vec<String>,
    rows: Vec<HashMap<String, String>>,
}

/// One seat's numbers for the coalition currently being rendered.
struct SeatData {
    name: String,
    total_votes: u64,
    votes: u64,
    share: f64,
    tie: bool,
}

impl SeatResultsTable {
    pub fn load(path: &Path) -> MapResult<Self> {
        let mut rdr = csv::Reader::from_path(path)?;
        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        for core in ["seat_number", "seat_name", "total_votes"] {
            if !headers.iter().any(|h| h == core) {
                return Err(MapError::MissingColumn(core.to_string()));
            }
        }
        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(
                headers
                    .iter()
                    .cloned()
                    .zip(record.iter().map(str::to_string))
                    .collect(),
            );
        }
        Ok(Self { headers, rows })
    }

    /// Whether the table carries this coalition's columns. Absent
    /// coalitions were added to the config after the tables were built.
    pub fn has_coalition(&self, key: &str) -> bool {
        let votes_col = format!("{}_votes", key);
        let share_col = format!("{}_share", key);
        self.headers.iter().any(|h| *h == votes_col)
            && self.headers.iter().any(|h| *h == share_col)
    }

    fn seat_data(&self, key: &str) -> HashMap<u32, SeatData> {
        let votes_col = format!("{}_votes", key);
        let share_col = format!("{}_share", key);
        let mut data = HashMap::new();
        for row in &self.rows {
            let number: u32 = match row.get("seat_number").and_then(|v| v.trim().parse().ok()) {
                Some(n) => n,
                None => continue,
            };
            data.insert(
                number,
                SeatData {
                    name: row.get("seat_name").cloned().unwrap_or_default(),
                    total_votes: parse_or_zero(row.get("total_votes")),
                    votes: parse_or_zero(row.get(&votes_col)),
                    share: row
                        .get(&share_col)
                        .and_then(|v| v.trim().parse().ok())
                        .unwrap_or(0.0),
                    tie: row.get("tie").map(|v| v == "true").unwrap_or(false),
                },
            );
        }
        data
    }
}

fn parse_or_zero(field: Option<&String>) -> u64 {
    field.and_then(|v| v.trim().parse().ok()).unwrap_or(0)
}

/// Render the page for one coalition: every boundary feature gets a
/// fill color from the coalition's scale at that seat's vote share,
/// plus a tooltip; seats absent from the table render at the bottom of
/// the scale with a "No data" tooltip.
pub fn render_map(
    boundaries: &Value,
    table: &SeatResultsTable,
    def: &CoalitionDefinition,
) -> MapResult<String> {
    let features = boundaries
        .get("features")
        .and_then(Value::as_array)
        .ok_or(MapError::NoFeatures)?;
    let data = table.seat_data(&def.key);

    let styled: Vec<Value> = features
        .iter()
        .map(|feature| {
            let mut feature = feature.clone();
            let seat = feature
                .get("properties")
                .and_then(|p| p.get(SEAT_NUMBER_PROPERTY))
                .and_then(property_u32)
                .and_then(|n| data.get(&n));
            let (fill, tooltip, tie) = match seat {
                Some(d) => (
                    scale_color(&def.color_scale, d.share),
                    format!(
                        "{}<br>Total votes: {}<br>{} votes: {} ({:.1}%)",
                        esc(&d.name),
                        group_digits(d.total_votes),
                        esc(&def.display_name),
                        group_digits(d.votes),
                        d.share * 100.0
                    ),
                    d.tie,
                ),
                None => (
                    scale_color(&def.color_scale, 0.0),
                    "No data".to_string(),
                    false,
                ),
            };
            if let Some(props) = feature
                .get_mut("properties")
                .and_then(Value::as_object_mut)
            {
                props.insert("fill_color".to_string(), json!(fill));
                props.insert("tooltip_html".to_string(), json!(tooltip));
                props.insert("tie".to_string(), json!(tie));
            }
            feature
        })
        .collect();

    let collection = json!({ "type": "FeatureCollection", "features": styled });
    let scale = &def.color_scale;
    let start_color = scale.first().map(|s| s.color.as_str()).unwrap_or("#808080");
    let end_color = scale.last().map(|s| s.color.as_str()).unwrap_or("#808080");
    let page = TEMPLATE
        .replace("{{TITLE}}", &esc(&format!("{} vote share", def.display_name)))
        .replace("{{START_COLOR}}", start_color)
        .replace("{{END_COLOR}}", end_color)
        .replace(
            "{{GENERATED}}",
            &chrono::Utc::now().format("%Y-%m-%d %H:%M UTC").to_string(),
        )
        .replace("{{BOUNDARIES}}", &inline_json(&collection));
    Ok(page)
}

fn property_u32(v: &Value) -> Option<u32> {
    match v {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Serialize for embedding in a `<script>` block: a literal `</` inside
/// a string would end the block early.
fn inline_json(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}

/// Minimal HTML escaping for text interpolated into tooltips.
fn esc(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use coalition_maps::commands::{build_maps, scrape};

#[derive(Parser)]
#[clap(
    name = "coalition-maps",
    about = "Scrape portal election results and build coalition choropleth maps"
)]
struct Opts {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape the election portal and write the three results tables.
    Scrape {
        /// Coalition definitions (ordered JSON array; order is the
        /// classification priority).
        #[clap(long, default_value = "config/coalitions.json")]
        config: PathBuf,
        /// Election portal URL. Omit to run offline from the snapshot.
        #[clap(long)]
        url: Option<String>,
        /// Local snapshot used when the portal cannot be fetched.
        #[clap(long, default_value = "data/tbs_election_2026.html")]
        local_html: PathBuf,
        /// CSV path for seat-level results.
        #[clap(long, default_value = "results/seat_results.csv")]
        out_seat_results: PathBuf,
        /// CSV path for national party totals.
        #[clap(long, default_value = "results/party_totals.csv")]
        out_party_totals: PathBuf,
        /// CSV path for per-seat party votes.
        #[clap(long, default_value = "results/party_by_seat.csv")]
        out_party_by_seat: PathBuf,
        /// Keep a copy of the downloaded page for future offline runs.
        #[clap(long)]
        save_html: bool,
        /// Script-settings key the results payload is assigned to.
        #[clap(long, default_value = "election2026")]
        payload_key: String,
    },
    /// Join seat results to boundary polygons and emit one map per coalition.
    BuildMaps {
        /// Coalition definitions (ordered JSON array).
        #[clap(long, default_value = "config/coalitions.json")]
        config: PathBuf,
        /// Seat-level results CSV produced by `scrape`.
        #[clap(long, default_value = "results/seat_results.csv")]
        seat_results: PathBuf,
        /// Constituency boundary polygons (GeoJSON, numeric `cst`
        /// property carrying the seat number).
        #[clap(long, default_value = "data/constituencies.geojson")]
        geojson: PathBuf,
        /// Directory for the per-coalition HTML maps.
        #[clap(long, default_value = "site/maps")]
        out_dir: PathBuf,
    },
}

fn main() {
    let opts = Opts::parse();
    let result = match opts.command {
        Command::Scrape {
            config,
            url,
            local_html,
            out_seat_results,
            out_party_totals,
            out_party_by_seat,
            save_html,
            payload_key,
        } => scrape(
            &config,
            url.as_deref(),
            &local_html,
            &out_seat_results,
            &out_party_totals,
            &out_party_by_seat,
            save_html,
            &payload_key,
        ),
        Command::BuildMaps {
            config,
            seat_results,
            geojson,
            out_dir,
        } => build_maps(&config, &seat_results, &geojson, &out_dir),
    };
    if let Err(e) = result {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

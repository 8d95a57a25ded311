mod maps;
mod scrape;

pub use maps::build_maps;
pub use scrape::scrape;

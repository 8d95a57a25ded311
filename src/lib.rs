pub mod coalitions;
pub mod commands;
pub mod fetch;
pub mod formats;
pub mod maps;
pub mod model;
pub mod reports;
pub mod util;

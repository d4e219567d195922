pub mod handle_scrape;

pub use handle_scrape::*;

//! HTTP request handlers organized by functionality

pub mod files;
pub mod scrape;

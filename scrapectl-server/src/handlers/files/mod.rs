pub mod handle_files;

pub use handle_files::*;

pub mod errors;
pub mod generator;
pub mod merger;
pub mod models;
pub mod pipeline;
pub mod publisher;
pub mod settings;
pub mod sources;
pub mod utils;

// Re-export the main entry points for easier access
pub use errors::MergeError;
pub use pipeline::{run, RunSummary};
pub use settings::Settings;

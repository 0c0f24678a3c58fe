pub mod config;
pub mod error;
pub mod model;
pub mod musicxml;
pub mod pipeline;
pub mod vocab;

pub use config::Config;
pub use error::PreprocessError;
pub use pipeline::corpus::BuildSummary;
pub use pipeline::sequences::TrainingData;
pub use vocab::Mapping;

//! Protocol-agnostic domain logic: configuration, chunking, scanning,
//! and the indexing pipeline over the embedding and store seams.

pub mod chunker;
pub mod config;
pub mod embed;
pub mod error;
pub mod ignore;
pub mod pipeline;
pub mod scanner;
pub mod services;
pub mod store;
pub mod types;

pub use chunker::Chunker;
pub use config::Config;
pub use error::{Result, SemdexError};
pub use pipeline::IndexPipeline;
pub use scanner::Scanner;
pub use services::Services;

pub mod agents;
pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod ingest;
pub mod llm;
pub mod pipeline;
pub mod tools;
pub mod utils;

// Library interface for newsdigest modules
// This allows tests and the binaries to import modules

pub mod bootstrap;
pub mod llm;
pub mod lookup;
pub mod models;
pub mod news;
pub mod pipeline;
pub mod report;
pub mod server;
pub mod telemetry;

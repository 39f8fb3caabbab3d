// Infrastructure layer module
// Database adapters and external service integrations

pub mod public_data;
pub mod repositories;

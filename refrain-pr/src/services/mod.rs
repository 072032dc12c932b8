//! Workflow services: outbound clients, prompt construction, orchestration

pub mod catalog_client;
pub mod cover_client;
pub mod orchestrator;
pub mod playlist_link;
pub mod prompt_builder;
pub mod suggestion_client;

pub use catalog_client::CatalogClient;
pub use cover_client::CoverClient;
pub use orchestrator::{NamingOrchestrator, PipelineError};
pub use playlist_link::extract_playlist_id;
pub use prompt_builder::build_prompt;
pub use suggestion_client::SuggestionClient;

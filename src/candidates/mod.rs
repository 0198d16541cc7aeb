// src/candidates/mod.rs

pub mod handlers;
pub mod ingestion;
pub mod models;
pub mod routes;
pub mod store;

#[cfg(test)]
mod tests;

// Re-export commonly used items
pub use models::{CandidateProfile, ProfileFields, ProfileSummary};
pub use routes::candidates_routes;

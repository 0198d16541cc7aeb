// src/jobs/handlers/mod.rs

pub mod manage;
pub mod public;

pub use manage::*;
pub use public::*;

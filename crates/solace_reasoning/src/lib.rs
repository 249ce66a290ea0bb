pub mod api_types;
pub mod engine;
pub mod llm;
pub mod pools;
pub mod prompts;
pub mod providers;
pub mod retry;
pub mod strategy;

pub use engine::CompanionEngine;
pub use strategy::{Reply, Strategy};

pub mod core;
pub mod selector;

// Re-export the main types for convenience
pub use core::Vocabulary;
pub use selector::{candidate_pool, select_next_with, RandomSelector, Selection, WordSelector};

//! MediNutri data crate - tabular dataset loading and the read-only index.
//!
//! Loads the food, medicine, herb, disease, interaction, and drug safety
//! CSV sources plus the JSON knowledge base once at startup. Everything is
//! immutable after construction and shared across requests without locks.

pub mod error;
pub mod index;
pub mod knowledge;
pub mod loader;
pub mod row;
pub mod schema;

pub use error::DataError;
pub use index::{DatasetIndex, DatasetStats, InteractionEntry};
pub use knowledge::{KnowledgeBase, KnowledgeEntry};
pub use loader::load_csv;
pub use row::Row;

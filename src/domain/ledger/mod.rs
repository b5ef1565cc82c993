//! Balance journal

pub mod model;
pub mod repository;

pub use model::{LedgerEntry, LedgerEntryKind};
pub use repository::LedgerRepository;

//! Protein interaction store domain

mod entity;
mod repository;

pub use entity::InteractionRecord;
pub use repository::InteractionStore;

#[cfg(test)]
pub use repository::MockInteractionStore;

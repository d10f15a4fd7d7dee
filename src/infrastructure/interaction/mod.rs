//! Interaction store implementations

mod in_memory;
mod json_file;

pub use in_memory::InMemoryInteractionStore;
pub use json_file::JsonFileInteractionStore;

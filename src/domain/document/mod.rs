//! Pipeline document domain - interactors, function claims and their audit tags

mod entity;
mod validity;

pub(crate) use entity::claims_of;
pub use entity::{
    coerce_integer, Context, Document, FunctionClaim, InteractionType, Interactor, UNKNOWN_PROTEIN,
};
pub use validity::Validity;

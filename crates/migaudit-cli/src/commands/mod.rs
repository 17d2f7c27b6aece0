pub mod align;
pub mod combine;
pub mod compare;
pub mod filter;
pub mod flatten;
pub mod record_types;
pub mod split;

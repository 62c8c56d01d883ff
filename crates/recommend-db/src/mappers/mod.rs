//! Entity to model mappers
//!
//! - `From<Model> for Entity` where every row is representable
//! - `TryFrom<Model> for Entity` where a column needs parsing (status text)

mod application;
mod invitation;
mod recommender;

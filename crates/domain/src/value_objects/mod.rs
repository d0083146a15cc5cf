//! Value Objects - Immutable, identity-less domain primitives

mod api_key;
mod condition;
mod location;

pub use api_key::ApiKey;
pub use condition::{Condition, ConditionCategory};
pub use location::{LocationId, LocationName};

pub mod data;
pub mod flatten;
pub mod model;
pub mod replay;
pub mod schema;

#[cfg(feature = "full")]
pub mod fetch;
#[cfg(feature = "full")]
pub mod record;

pub mod error;
pub mod lookup;

pub use error::LookupError;
pub use lookup::{LookupClient, LookupConfig, LookupOutcome, MovieMatch};

pub mod errors;
pub mod id;

pub use errors::{ClientError, ConfigError, LoanchatError, RetrieveError};
pub use id::{new_correlation_id, SessionToken};

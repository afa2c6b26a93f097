mod error;
mod keys;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use keys::draft_key;
pub use serialization::{deserialize_draft, serialize_draft, SerializationError};
pub use traits::Cache;

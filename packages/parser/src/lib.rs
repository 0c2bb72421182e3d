//! CNXML markup loading and serialization.

pub mod dom;
pub mod error;
pub mod loader;
pub mod serializer;

pub use error::{LoadError, LoadResult};
pub use loader::{deserialize, load, Loader};
pub use serializer::{serialize, serialize_nodes};

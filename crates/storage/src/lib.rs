pub mod error;
pub mod index;
pub mod store;

pub use error::IndexError;
pub use index::{IndexEntry, SearchHit, VectorIndex, FORMAT_VERSION};
pub use store::IndexStore;

//! vasc-storage
//!
//! The storage layer the calculator reads exams from and writes results to.
//! `ExamStore` is the seam; `MemoryStore` and `FileStore` implement it.
//! `persist()` is the best-effort write-back of calculated fields.

pub mod error;
pub mod file;
pub mod memory;
pub mod persist;
pub mod store;

pub use crate::error::StorageError;
pub use crate::file::FileStore;
pub use crate::memory::MemoryStore;
pub use crate::persist::{persist, PersistFailure, PersistReport};
pub use crate::store::{BoxFuture, ExamStore};

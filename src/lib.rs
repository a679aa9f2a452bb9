// kartstore - Generic JSON record store for the CloudKart storefront

pub mod backend;
pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod record;
pub mod seed;
pub mod session;
pub mod store;

// Re-export main types for convenience
pub use backend::{Backend, FileBackend, MemoryBackend, SqliteBackend};
pub use config::{BackendConfig, Config};
pub use error::{Result, StoreError};
pub use models::{Category, Order, OrderItem, OrderStatus, Product, Schema, TypedRecord, User};
pub use query::{Criteria, Criterion, Page, SortOrder};
pub use record::{Fields, Record};
pub use seed::{reset_sample_data, seed_sample_data};
pub use session::{Registration, Session};
pub use store::{Snapshot, Store, TableStats};

//! Data models: configuration, schemas, and validated records.

pub mod config;
pub mod record;
pub mod schema;

pub use config::FacturoConfig;
pub use record::InvoiceRecord;
pub use schema::{fields, ExpectedSchema, LayoutVariant};

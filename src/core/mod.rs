mod error;
mod record;

pub use error::{Result, StoreError};
pub use record::{Record, fresh_id, now_rfc3339, record_from, record_id};

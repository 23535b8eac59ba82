mod builder;
mod filter;
mod results;
mod sort;

pub use builder::{InsertPayload, TableQuery};
pub use results::{DeleteResult, InsertResult, SelectResult, UpdateResult};

mod error;
mod routes;
mod state;

pub use error::{ErrorResponse, WebError};
pub use routes::router;
pub use state::AppState;

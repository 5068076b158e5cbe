pub mod error;
pub mod handlers;
pub mod routes;
pub mod types;

pub use handlers::AppState;
pub use routes::router;

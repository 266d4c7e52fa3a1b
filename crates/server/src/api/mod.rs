pub mod browse;
pub mod convert;
pub mod handlers;
pub mod routes;
pub mod upload;

pub use routes::create_router;

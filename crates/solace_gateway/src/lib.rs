pub mod server;
pub mod types;

pub use server::{router, GatewayServer};
pub use types::{ChatRequest, ErrorBody};

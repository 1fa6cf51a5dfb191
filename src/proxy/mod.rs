pub mod error;
pub mod handlers;

pub use error::ProxyError;
pub use handlers::*;

pub mod auth;
pub mod payload;
pub mod response;

pub use auth::{authenticate, jwt_auth_middleware, AuthUser};
pub use payload::Payload;
pub use response::{ApiResponse, ApiResult, Message};

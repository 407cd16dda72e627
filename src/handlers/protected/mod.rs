// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Security Level: JWT access token
// Middleware: jwt_auth_middleware injects `AuthUser`; bodies go through `Payload<T>`
//
// The caller's id is the only owner value ever written. Task and donation listings
// are scoped to the caller; shop and receiver listings are not.

pub mod donation;
pub mod order;
pub mod receiver;
pub mod shop;
pub mod task;

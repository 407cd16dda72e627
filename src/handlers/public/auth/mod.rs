// handlers/public/auth/mod.rs - Token acquisition endpoints

pub mod login; // POST /login/ - authenticate and get JWT pair
pub mod register; // POST /register/ - create new account

pub use login::login;
pub use register::register;

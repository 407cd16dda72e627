// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (JWT access token)
pub mod protected; // Tier 2: requires `Authorization: Bearer <access>`
pub mod public; // Tier 1: registration, login, service info

// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (bearer JWT)
pub mod protected;
pub mod public;

// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Account creation, email verification, password reset and token
// acquisition. No user context exists here, so every input is validated
// through the form layer before it reaches the store.

pub mod service;
pub mod users;

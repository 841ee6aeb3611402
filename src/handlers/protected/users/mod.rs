// handlers/protected/users/mod.rs - Account handlers for the authenticated caller

pub mod profile;

pub use profile::{profile_get, profile_update};

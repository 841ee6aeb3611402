// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Every route here sits behind `jwt_auth_middleware`, which places an
// `AuthAccount` in the request extensions. Handlers resolve the account from
// that extension only.

pub mod users;

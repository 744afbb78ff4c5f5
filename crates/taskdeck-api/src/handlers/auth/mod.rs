//! Authentication handlers
//!
//! Tokens travel in HttpOnly cookies only; response bodies never contain
//! them.
//!
//! ## Endpoints
//! - POST /api/auth/register - Create an account
//! - POST /api/auth/login - Verify credentials and set both token cookies
//! - POST /api/auth/refresh - Mint a new access token from the refresh cookie
//! - POST /api/auth/logout - Clear both cookies
//! - GET /api/auth/me - Current user, or `null`

pub mod models;

mod login;
mod logout;
mod me;
mod refresh;
mod register;

pub use login::login_handler;
pub use logout::logout_handler;
pub use me::me_handler;
pub use refresh::refresh_handler;
pub use register::register_handler;

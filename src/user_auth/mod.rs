//! Bearer-token authentication and role guard
//!
//! Tokens are issued by the identity provider. The gateway only verifies them
//! and turns the claims into a [`CallerIdentity`].

pub mod identity;
pub mod middleware;
pub mod service;

pub use identity::{CallerIdentity, Role};
pub use middleware::{AuthRejection, jwt_auth_middleware, require_roles};
pub use service::{Claims, JwtAuthService};

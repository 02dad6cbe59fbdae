//! Authentication module
//!
//! JWT verification and issuance, credential carriers, the
//! authenticate/authorize middleware pair and argon2 password hashing.

pub mod credential;
mod jwt;
mod middleware;
mod password;

pub use credential::CredentialSource;
pub use jwt::{Claims, JwtService, TokenIssueError};
pub use middleware::{
    authenticate, authorize, AuthUser, Identity, RoleAuthorizer, TokenAuthenticator,
};
pub use password::PasswordService;

//! Data access layer

pub mod user;

pub use user::{
    InMemoryUserRepository, NewUser, PgUserRepository, RepositoryError, RepositoryResult,
    UserRepository,
};

//! Database repository layer

pub mod catalog_repo;
pub mod credential_store;
pub mod project_repo;
pub mod server_repo;
pub mod user_repo;

pub use catalog_repo::CatalogRepository;
pub use credential_store::CredentialStore;
pub use project_repo::ProjectRepository;
pub use server_repo::ServerRepository;
pub use user_repo::UserRepository;

/// Postgres unique-violation check (SQLSTATE 23505)
///
/// Uniqueness races (two requests both observing "name free") are settled by
/// the database constraint, not by application logic; this is how the losing
/// request finds out.
pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

//! Database module for SQLite operations.
//!
//! This module provides:
//! - Database initialization and migrations
//! - SQLite pragma configuration
//! - Repository layer for database operations

pub mod migrations;
pub mod repo;

pub use migrations::init_db;
pub use repo::Repository;

use thiserror::Error;

/// Repository failures that callers need to tell apart from plain SQL errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("player {0} not found")]
    MissingPlayer(i64),
    #[error("exercise {0} not found")]
    MissingExercise(i64),
    #[error("email {0} already registered")]
    DuplicateEmail(String),
    #[error("exercise {0} already exists")]
    DuplicateExercise(String),
    #[error("exercise {0} is referenced by workout sets")]
    ExerciseInUse(i64),
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

/// True when `err` is a UNIQUE constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.is_unique_violation(),
        _ => false,
    }
}

/// True when `err` is a FOREIGN KEY constraint violation.
pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.is_foreign_key_violation(),
        _ => false,
    }
}

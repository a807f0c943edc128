//! Classification of database errors.

/// Returns true if `e` is a unique or primary key violation.
///
/// The `mappings` table has a single uniqueness constraint (the `code` primary
/// key), so any unique violation on insert means the code is taken.
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}

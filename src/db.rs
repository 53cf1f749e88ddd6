//! Database setup and the scoped unit of work used by every request.

use std::sync::Mutex;

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{Error, item::create_item_table};

/// Create all the tables needed by the application.
///
/// Safe to call on a database that has already been initialized.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_item_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Run `work` inside a single database transaction.
///
/// The lock on `db_connection` is held for the duration of `work` and
/// released when this function returns. The transaction is committed if
/// `work` succeeds and rolled back otherwise.
///
/// # Errors
/// Returns [Error::DatabaseLockError] if the lock is poisoned, otherwise
/// any error from `work` or from committing the transaction.
pub fn unit_of_work<T>(
    db_connection: &Mutex<Connection>,
    work: impl FnOnce(&SqlTransaction) -> Result<T, Error>,
) -> Result<T, Error> {
    let mut connection = db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = connection.transaction()?;
    let result = work(&transaction)?;
    transaction.commit()?;

    Ok(result)
}

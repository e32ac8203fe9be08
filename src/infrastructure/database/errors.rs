//! Normalization of sea-orm / sqlx failures into [`BackendError`].
//!
//! PostgreSQL already speaks SQLSTATE; SQLite extended result codes are
//! translated to the SQLSTATE with the same meaning so the HTTP layer only
//! has one vocabulary to classify.

use std::io;

use sea_orm::sqlx;
use sea_orm::sqlx::postgres::PgDatabaseError;
use sea_orm::{DbErr, RuntimeErr};

use crate::domain::{
    BackendError, DomainError, CONNECTION_REFUSED, HOST_NOT_FOUND, RECORD_NOT_FOUND,
};

impl From<DbErr> for BackendError {
    fn from(err: DbErr) -> Self {
        match &err {
            DbErr::Conn(RuntimeErr::SqlxError(e))
            | DbErr::Exec(RuntimeErr::SqlxError(e))
            | DbErr::Query(RuntimeErr::SqlxError(e)) => from_sqlx(e),
            DbErr::ConnectionAcquire(_) => {
                BackendError::new(err.to_string()).with_code(CONNECTION_REFUSED)
            }
            DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => {
                BackendError::new(err.to_string()).with_code(RECORD_NOT_FOUND)
            }
            _ => BackendError::new(err.to_string()),
        }
    }
}

impl From<DbErr> for DomainError {
    fn from(err: DbErr) -> Self {
        DomainError::Backend(err.into())
    }
}

fn from_sqlx(err: &sqlx::Error) -> BackendError {
    match err {
        sqlx::Error::Database(db) => {
            if let Some(pg) = db.try_downcast_ref::<PgDatabaseError>() {
                let mut out = BackendError::new(pg.message()).with_code(pg.code());
                out.detail = pg.detail().map(str::to_string);
                out.column = pg.column().map(str::to_string);
                return out;
            }
            let code = db.code().map(|c| c.into_owned());
            from_sqlite(code.as_deref(), db.message())
        }
        sqlx::Error::Io(io_err) => {
            let out = BackendError::new(io_err.to_string());
            match io_code(io_err) {
                Some(code) => out.with_code(code),
                None => out,
            }
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            BackendError::new(err.to_string()).with_code(CONNECTION_REFUSED)
        }
        sqlx::Error::RowNotFound => BackendError::new(err.to_string()).with_code(RECORD_NOT_FOUND),
        other => BackendError::new(other.to_string()),
    }
}

fn io_code(err: &io::Error) -> Option<&'static str> {
    match err.kind() {
        io::ErrorKind::ConnectionRefused => Some(CONNECTION_REFUSED),
        io::ErrorKind::NotFound => Some(HOST_NOT_FOUND),
        _ if err.to_string().contains("failed to lookup address") => Some(HOST_NOT_FOUND),
        _ => None,
    }
}

/// Map a SQLite error (extended result code + message) onto SQLSTATE terms.
pub fn from_sqlite(code: Option<&str>, message: &str) -> BackendError {
    let column = constraint_column(message);
    let out = BackendError::new(message);

    match code {
        // SQLITE_CONSTRAINT_UNIQUE, SQLITE_CONSTRAINT_PRIMARYKEY
        Some("2067") | Some("1555") => {
            let out = out.with_code("23505");
            match column {
                Some(col) => out
                    .with_detail(format!("Key ({col}) already exists."))
                    .with_column(col),
                None => out,
            }
        }
        // SQLITE_CONSTRAINT_NOTNULL
        Some("1299") => {
            let out = out.with_code("23502");
            match column {
                Some(col) => out.with_column(col),
                None => out,
            }
        }
        // SQLITE_CONSTRAINT_FOREIGNKEY
        Some("787") => out.with_code("23503"),
        // SQLITE_CONSTRAINT_CHECK
        Some("275") => out.with_code("23514"),
        _ if message.starts_with("no such table") => out.with_code("42P01"),
        _ if message.starts_with("no such column") => out.with_code("42703"),
        _ if message.contains("syntax error") => out.with_code("42601"),
        _ => match code {
            Some(code) => out.with_code(code),
            None => out,
        },
    }
}

/// `"NOT NULL constraint failed: productos.nombre"` -> `nombre`
fn constraint_column(message: &str) -> Option<String> {
    let (_, target) = message.split_once("constraint failed: ")?;
    let first = target.split(',').next()?.trim();
    let column = first.rsplit('.').next()?;
    (!column.is_empty()).then(|| column.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_unique_becomes_23505_with_key_detail() {
        let err = from_sqlite(Some("2067"), "UNIQUE constraint failed: productos.nombre");
        assert_eq!(err.code.as_deref(), Some("23505"));
        assert_eq!(err.detail.as_deref(), Some("Key (nombre) already exists."));
        assert_eq!(err.column.as_deref(), Some("nombre"));
    }

    #[test]
    fn sqlite_not_null_carries_column() {
        let err = from_sqlite(Some("1299"), "NOT NULL constraint failed: productos.descripcion");
        assert_eq!(err.code.as_deref(), Some("23502"));
        assert_eq!(err.column.as_deref(), Some("descripcion"));
    }

    #[test]
    fn sqlite_schema_errors_map_to_undefined_object() {
        assert_eq!(
            from_sqlite(Some("1"), "no such table: ghost").code.as_deref(),
            Some("42P01")
        );
        assert_eq!(
            from_sqlite(Some("1"), "no such column: colour").code.as_deref(),
            Some("42703")
        );
        assert_eq!(
            from_sqlite(Some("1"), "near \"SELEC\": syntax error").code.as_deref(),
            Some("42601")
        );
    }

    #[test]
    fn unknown_sqlite_code_is_kept() {
        let err = from_sqlite(Some("5"), "database is locked");
        assert_eq!(err.code.as_deref(), Some("5"));
        assert_eq!(err.message, "database is locked");
    }

    #[test]
    fn record_not_found_is_tagged() {
        let err = BackendError::from(DbErr::RecordNotFound("producto 9".into()));
        assert_eq!(err.code.as_deref(), Some(RECORD_NOT_FOUND));
    }

    #[test]
    fn refused_io_maps_to_connection_code() {
        let io_err = io::Error::new(io::ErrorKind::ConnectionRefused, "refused");
        assert_eq!(io_code(&io_err), Some(CONNECTION_REFUSED));
        let lookup = io::Error::new(io::ErrorKind::Other, "failed to lookup address information");
        assert_eq!(io_code(&lookup), Some(HOST_NOT_FOUND));
    }
}

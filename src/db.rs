use crate::errors::IngestError;
use rusqlite::Connection;
use std::path::Path;

/// Open a connection, run one write operation against it, and close
/// it again. Every database operation gets its own short-lived
/// connection; the handle is dropped (and closed) on success and
/// error alike.
pub fn with_connection<T, F>(path: &Path, op: F) -> Result<T, IngestError>
where
    F: FnOnce(&mut Connection) -> Result<T, IngestError>,
{
    let mut conn = Connection::open(path)?;
    op(&mut conn)
}

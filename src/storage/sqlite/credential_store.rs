use crate::credentials::{CredentialError, CredentialStore, CredentialType, Credentials};
use crate::storage::sqlite::SqliteStorage;

/// Durable [`CredentialStore`] backed by the `credentials` table.
pub struct SqliteCredentialStore {
    storage: SqliteStorage,
}

impl SqliteCredentialStore {
    pub fn new(storage: SqliteStorage) -> Self {
        Self { storage }
    }
}

fn storage_error(err: impl std::fmt::Display) -> CredentialError {
    CredentialError::Storage(err.to_string())
}

impl CredentialStore for SqliteCredentialStore {
    fn store(&self, credentials: &Credentials, server: &str) -> Result<(), CredentialError> {
        let conn = self.storage.connection().map_err(storage_error)?;
        conn.execute(
            "INSERT INTO credentials (kind, server, username, secret) VALUES (?1, ?2, ?3, ?4) \
             ON CONFLICT (kind, server, username) DO UPDATE SET secret = excluded.secret",
            (
                credentials.kind.as_str(),
                server,
                &credentials.username,
                &credentials.secret,
            ),
        )
        .map_err(storage_error)?;
        Ok(())
    }

    fn retrieve(
        &self,
        kind: CredentialType,
        server: &str,
        username: &str,
    ) -> Result<Credentials, CredentialError> {
        let conn = self.storage.connection().map_err(storage_error)?;
        let secret = conn.query_row(
            "SELECT secret FROM credentials WHERE kind = ?1 AND server = ?2 AND username = ?3",
            (kind.as_str(), server, username),
            |row| row.get::<_, String>(0),
        );

        match secret {
            Ok(secret) => Ok(Credentials::new(kind, username, secret)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(CredentialError::NotFound {
                kind: kind.as_str(),
                server: server.to_string(),
                username: username.to_string(),
            }),
            Err(e) => Err(storage_error(e)),
        }
    }
}

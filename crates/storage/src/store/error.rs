#![forbid(unsafe_code)]

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Sql(rusqlite::Error),
    Json(serde_json::Error),
    Csv(ct_tabular::CodecError),
    InvalidInput(&'static str),
    DuplicateKey {
        field: &'static str,
        value: String,
    },
    SnapshotVersionAhead {
        store: &'static str,
        persisted: i64,
        supported: i64,
    },
    Migration {
        store: &'static str,
        to_version: i64,
        message: &'static str,
    },
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io: {err}"),
            Self::Sql(err) => write!(f, "sqlite: {err}"),
            Self::Json(err) => write!(f, "json: {err}"),
            Self::Csv(err) => write!(f, "csv: {err}"),
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::DuplicateKey { field, value } => {
                write!(f, "duplicate key (field={field}, value={value})")
            }
            Self::SnapshotVersionAhead {
                store,
                persisted,
                supported,
            } => write!(
                f,
                "snapshot version ahead (store={store}, persisted=v{persisted}, supported=v{supported})"
            ),
            Self::Migration {
                store,
                to_version,
                message,
            } => write!(
                f,
                "migration failed (store={store}, to=v{to_version}): {message}"
            ),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sql(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<ct_tabular::CodecError> for StoreError {
    fn from(value: ct_tabular::CodecError) -> Self {
        Self::Csv(value)
    }
}

use std::path::PathBuf;

/// Failure modes when loading a schema from its source.
///
/// The provider turns these into the `fetch_error` text shown in the explorer, so every
/// message is written to be read by the person looking at the panel.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Failed to read schema file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to start schema command `{command}`: {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Schema command `{command}` exited with code {code}: {stderr}")]
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("Schema is not valid introspection JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Introspection result has no `__schema` object")]
    MissingSchema,

    #[error("Malformed introspection data: {0}")]
    Malformed(String),
}

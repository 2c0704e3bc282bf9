/// Errors raised by the connection pool registry
#[derive(thiserror::Error, Debug)]
pub enum PoolError {
    #[error("pool already exists for db '{database}'")]
    AlreadyExists { database: String },

    #[error("found an existing pool for db {database} and unable to verify closed state: {source}")]
    UnverifiedState {
        database: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("unable to create pool for db {database}: {source}")]
    Create {
        database: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("no open pool found for db {database}")]
    NotFound { database: String },

    #[error("unable to acquire a connection for db {database}: {source}")]
    Acquire {
        database: String,
        #[source]
        source: sqlx::Error,
    },
}

impl PoolError {
    /// Name of the database the failed operation targeted
    pub fn database(&self) -> &str {
        match self {
            PoolError::AlreadyExists { database }
            | PoolError::UnverifiedState { database, .. }
            | PoolError::Create { database, .. }
            | PoolError::NotFound { database }
            | PoolError::Acquire { database, .. } => database,
        }
    }
}

/// Client-level errors
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("API returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Pool(#[from] PoolError),
}

pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_error_messages_name_database() {
        let err = PoolError::AlreadyExists {
            database: "alice/rep-tracker".to_string(),
        };
        assert_eq!(err.to_string(), "pool already exists for db 'alice/rep-tracker'");
        assert_eq!(err.database(), "alice/rep-tracker");

        let err = PoolError::Acquire {
            database: "alice/rep-tracker".to_string(),
            source: sqlx::Error::PoolTimedOut,
        };
        assert!(err.to_string().starts_with("unable to acquire a connection for db alice/rep-tracker"));
    }

    #[test]
    fn test_pool_error_converts_into_client_error() {
        let err: ClientError = PoolError::NotFound {
            database: "alice/db".to_string(),
        }
        .into();
        assert!(matches!(err, ClientError::Pool(PoolError::NotFound { .. })));
        assert_eq!(err.to_string(), "no open pool found for db alice/db");
    }

    #[test]
    fn test_api_error_display() {
        let err = ClientError::Api {
            status: 401,
            body: "{\"error\":\"bad token\"}".to_string(),
        };
        assert_eq!(err.to_string(), "API returned status 401: {\"error\":\"bad token\"}");
    }
}

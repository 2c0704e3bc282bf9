pub mod conn_string;
pub mod pool;
pub mod registry;

pub use conn_string::connection_string;
pub use pool::{Connector, DatabasePool, PgConnector};
pub use registry::PoolRegistry;

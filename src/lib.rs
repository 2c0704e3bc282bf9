//! Client for the bit.io developer API and pooled direct Postgres connections.

pub mod api;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod models;

pub use client::BitDotIo;
pub use config::Config;
pub use db::{Connector, DatabasePool, PgConnector, PoolRegistry};
pub use error::{ClientError, ClientResult, PoolError};

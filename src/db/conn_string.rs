use url::form_urlencoded;

use crate::config::{
    APP_NAME, DB_HOST, DB_PORT, MAX_CONN_IDLE_TIME, POOL_MIN_CONNS, SSL_MODE, USER_AGENT,
};

pub const PARAM_USER: &str = "user";
pub const PARAM_PASSWORD: &str = "password";
pub const PARAM_DBNAME: &str = "dbname";
pub const PARAM_SSL_MODE: &str = "sslmode";
pub const PARAM_APPLICATION_NAME: &str = "application_name";
pub const PARAM_MIN_CONNS: &str = "pool_min_conns";
pub const PARAM_MAX_CONNS: &str = "pool_max_conns";
pub const PARAM_MAX_CONN_IDLE_TIME: &str = "pool_max_conn_idle_time";

/// Builds the connection string for a database
///
/// Host and port live in the authority; everything else, including the
/// `owner/name` database, is a query parameter so no value needs path or
/// userinfo escaping. A `max_connections` of 0 omits `pool_max_conns` so the
/// pool falls back to its own default.
pub fn connection_string(access_token: &str, db_name: &str, max_connections: u32) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query
        .append_pair(PARAM_USER, USER_AGENT)
        .append_pair(PARAM_PASSWORD, access_token)
        .append_pair(PARAM_DBNAME, db_name)
        .append_pair(PARAM_SSL_MODE, SSL_MODE)
        .append_pair(PARAM_APPLICATION_NAME, APP_NAME)
        .append_pair(PARAM_MIN_CONNS, &POOL_MIN_CONNS.to_string())
        .append_pair(
            PARAM_MAX_CONN_IDLE_TIME,
            &format!("{}s", MAX_CONN_IDLE_TIME.as_secs()),
        );
    if max_connections != 0 {
        query.append_pair(PARAM_MAX_CONNS, &max_connections.to_string());
    }

    format!("postgresql://{}:{}/?{}", DB_HOST, DB_PORT, query.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn query_value(conn_str: &str, key: &str) -> Option<String> {
        let url = Url::parse(conn_str).unwrap();
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    #[test]
    fn test_connection_string_fixed_parts() {
        let conn_str = connection_string("v2_secret", "alice/rep-tracker", 0);
        let url = Url::parse(&conn_str).unwrap();

        assert_eq!(url.scheme(), "postgresql");
        assert_eq!(url.host_str(), Some("db.bit.io"));
        assert_eq!(url.port(), Some(5432));
        assert_eq!(query_value(&conn_str, "user").as_deref(), Some(USER_AGENT));
        assert_eq!(query_value(&conn_str, "password").as_deref(), Some("v2_secret"));
        assert_eq!(
            query_value(&conn_str, "dbname").as_deref(),
            Some("alice/rep-tracker")
        );
        assert_eq!(query_value(&conn_str, "sslmode").as_deref(), Some("require"));
        assert_eq!(query_value(&conn_str, "pool_min_conns").as_deref(), Some("0"));
        assert_eq!(
            query_value(&conn_str, "pool_max_conn_idle_time").as_deref(),
            Some("299s")
        );
        assert_eq!(
            query_value(&conn_str, "application_name").as_deref(),
            Some(APP_NAME)
        );
    }

    #[test]
    fn test_connection_string_escapes_token() {
        let conn_str = connection_string("a&b=c", "alice/db", 0);
        assert_eq!(query_value(&conn_str, "password").as_deref(), Some("a&b=c"));
    }

    #[test]
    fn test_connection_string_max_connections_pass_through() {
        let conn_str = connection_string("token", "u/db", 5);
        assert_eq!(query_value(&conn_str, "pool_max_conns").as_deref(), Some("5"));
    }

    #[test]
    fn test_connection_string_zero_max_connections_omitted() {
        let conn_str = connection_string("token", "u/db", 0);
        assert_eq!(query_value(&conn_str, "pool_max_conns"), None);
        assert!(!conn_str.contains("pool_max_conns"));
    }

    #[test]
    fn test_connection_string_parses_as_url() {
        let conn_str = connection_string("token with spaces", "u/db", 0);
        assert!(conn_str.starts_with("postgresql://db.bit.io:5432/?"));
        assert_eq!(
            query_value(&conn_str, "password").as_deref(),
            Some("token with spaces")
        );
    }

    #[test]
    fn test_connection_string_is_deterministic() {
        assert_eq!(
            connection_string("token", "u/db", 3),
            connection_string("token", "u/db", 3)
        );
    }
}

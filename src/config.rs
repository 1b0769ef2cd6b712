//! Configuration for influxline
//!
//! The connection target handed to every HTTP call, with sensible defaults.

use std::time::Duration;

/// Connection target for an InfluxDB server
#[derive(Debug, Clone)]
pub struct ServerInfo {
    // -------------------------------------------------------------------------
    // Endpoint
    // -------------------------------------------------------------------------
    /// Dotted IPv4 address (no DNS resolution is performed)
    pub host: String,

    /// TCP/UDP port
    pub port: u16,

    // -------------------------------------------------------------------------
    // Database and Credentials
    // -------------------------------------------------------------------------
    /// Database name sent as `db=`
    pub db: String,

    /// Username sent as `u=`
    pub user: String,

    /// Password sent as `p=`
    pub password: String,

    // -------------------------------------------------------------------------
    // Timeouts (0 = block forever)
    // -------------------------------------------------------------------------
    /// Connect timeout (milliseconds)
    pub connect_timeout_ms: u64,

    /// Socket read timeout (milliseconds)
    pub read_timeout_ms: u64,

    /// Socket write timeout (milliseconds)
    pub write_timeout_ms: u64,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8086,
            db: String::new(),
            user: String::new(),
            password: String::new(),
            connect_timeout_ms: 0,
            read_timeout_ms: 0,
            write_timeout_ms: 0,
        }
    }
}

impl ServerInfo {
    /// Create a target with credentials and blocking sockets
    pub fn new(
        host: impl Into<String>,
        port: u16,
        db: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            db: db.into(),
            user: user.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    /// Create a new server info builder
    pub fn builder() -> ServerInfoBuilder {
        ServerInfoBuilder::default()
    }

    pub(crate) fn connect_timeout(&self) -> Option<Duration> {
        millis(self.connect_timeout_ms)
    }

    pub(crate) fn read_timeout(&self) -> Option<Duration> {
        millis(self.read_timeout_ms)
    }

    pub(crate) fn write_timeout(&self) -> Option<Duration> {
        millis(self.write_timeout_ms)
    }
}

fn millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

/// Builder for ServerInfo
#[derive(Default)]
pub struct ServerInfoBuilder {
    info: ServerInfo,
}

impl ServerInfoBuilder {
    /// Set the server address (dotted IPv4)
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.info.host = host.into();
        self
    }

    /// Set the server port
    pub fn port(mut self, port: u16) -> Self {
        self.info.port = port;
        self
    }

    /// Set the database name
    pub fn db(mut self, db: impl Into<String>) -> Self {
        self.info.db = db.into();
        self
    }

    /// Set the username
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.info.user = user.into();
        self
    }

    /// Set the password
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.info.password = password.into();
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.info.connect_timeout_ms = ms;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.info.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.info.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> ServerInfo {
        self.info
    }
}

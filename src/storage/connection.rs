//! Connection manager.
//!
//! Owns the client session and the registry of bound databases. The manager is
//! created empty, `connect()` opens the session, and each `connect_database()`
//! adds one entry to the registry. Data-access helpers look databases up here and
//! fail with `StoreError::DatabaseNotConnected` instead of dereferencing a
//! missing handle.

use std::collections::HashMap;
use std::fmt;

use log::{info, warn};

use crate::error_handling::StoreError;
use crate::storage::backend::{DatabaseHandle, StoreClient};

/// Username/password pair for SCRAM authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Result of binding a database: the handle is registered either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseStatus {
    /// The bind-time ping succeeded.
    Reachable,
    /// The bind-time ping failed; later operations re-check and will report the failure.
    Unreachable,
}

/// Client session plus a name → database handle registry.
pub struct ConnectionManager {
    uri: String,
    credentials: Option<Credentials>,
    client: Option<StoreClient>,
    databases: HashMap<String, DatabaseHandle>,
}

impl ConnectionManager {
    /// Creates a disconnected manager.
    pub fn new(uri: impl Into<String>, credentials: Option<Credentials>) -> Self {
        ConnectionManager {
            uri: uri.into(),
            credentials,
            client: None,
            databases: HashMap::new(),
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    /// Names of every bound database, sorted.
    pub fn database_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.databases.keys().cloned().collect();
        names.sort();
        names
    }

    /// Opens the client session for the configured URI and verifies it with a ping.
    ///
    /// On failure the error is logged and returned, and the manager stays
    /// disconnected.
    ///
    /// # Errors
    ///
    /// `StoreError::Connect` if the URI cannot be parsed or the client cannot be
    /// built, `StoreError::Ping` if the server does not answer.
    pub async fn connect(&mut self) -> Result<(), StoreError> {
        let client = match StoreClient::open(&self.uri, self.credentials.as_ref()).await {
            Ok(client) => client,
            Err(e) => {
                warn!("{e}");
                self.disconnect().await;
                return Err(e);
            }
        };
        self.connect_with(client).await
    }

    /// Adopts an already-created client after verifying it with a ping.
    ///
    /// Any previous session and its database handles are released first, so a
    /// failed reconnect leaves the manager disconnected.
    pub async fn connect_with(&mut self, client: impl Into<StoreClient>) -> Result<(), StoreError> {
        self.disconnect().await;
        let client = client.into();
        if let Err(e) = client.ping().await {
            warn!("pinging {} - {e}", self.uri);
            return Err(e);
        }
        self.client = Some(client);
        info!("connected to host '{}'", self.uri);
        Ok(())
    }

    /// Binds `name` under the current session and records it in the registry.
    ///
    /// The handle is recorded even when the bind-time ping fails; that failure
    /// is logged and reported as `DatabaseStatus::Unreachable`.
    ///
    /// # Errors
    ///
    /// `StoreError::NotConnected` if `connect()` has not succeeded.
    pub async fn connect_database(&mut self, name: &str) -> Result<DatabaseStatus, StoreError> {
        let client = self.client.as_ref().ok_or(StoreError::NotConnected)?;
        let handle = client.database(name);
        let status = match handle.ping().await {
            Ok(()) => {
                info!("connected to db '{name}'");
                DatabaseStatus::Reachable
            }
            Err(e) => {
                warn!("{e}");
                DatabaseStatus::Unreachable
            }
        };
        self.databases.insert(name.to_string(), handle);
        Ok(status)
    }

    /// Binds every name in `names`, in order.
    pub async fn connect_all<S: AsRef<str>>(
        &mut self,
        names: &[S],
    ) -> Result<Vec<(String, DatabaseStatus)>, StoreError> {
        let mut statuses = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let status = self.connect_database(name).await?;
            statuses.push((name.to_string(), status));
        }
        Ok(statuses)
    }

    /// Looks up a bound database.
    ///
    /// # Errors
    ///
    /// `StoreError::NotConnected` before `connect()`,
    /// `StoreError::DatabaseNotConnected` for names never bound.
    pub fn database(&self, name: &str) -> Result<&DatabaseHandle, StoreError> {
        if self.client.is_none() {
            return Err(StoreError::NotConnected);
        }
        self.databases
            .get(name)
            .ok_or_else(|| StoreError::DatabaseNotConnected(name.to_string()))
    }

    /// Releases the session and forgets every database handle. No-op when disconnected.
    pub async fn disconnect(&mut self) {
        self.databases.clear();
        if let Some(client) = self.client.take() {
            client.shutdown().await;
            info!("disconnected from '{}'", self.uri);
        }
    }
}

//! MongoDB backend.
//!
//! Thin wrappers over the `mongodb` driver that translate driver errors into
//! `StoreError`s carrying the database or namespace they happened in.

use futures::TryStreamExt;
use log::debug;
use mongodb::bson::{doc, Bson, Document};
use mongodb::options::{AuthMechanism, ClientOptions, Credential};
use mongodb::{Client, Database};

use crate::config::ADMIN_DATABASE;
use crate::error_handling::StoreError;
use crate::storage::connection::Credentials;
use crate::storage::query::UpdateSummary;

/// Client handle for a MongoDB deployment.
#[derive(Clone)]
pub struct MongoClient {
    client: Client,
}

impl MongoClient {
    /// Parses `uri`, attaches SCRAM-SHA-1 credentials when given and creates the client.
    ///
    /// The driver connects lazily; callers verify reachability with `ping`.
    pub async fn connect(uri: &str, credentials: Option<&Credentials>) -> Result<Self, StoreError> {
        let connect_error = |e: mongodb::error::Error| StoreError::Connect {
            uri: uri.to_string(),
            message: e.to_string(),
        };

        let mut options = ClientOptions::parse(uri).await.map_err(connect_error)?;
        if let Some(credentials) = credentials {
            let mut credential = Credential::default();
            credential.username = Some(credentials.username().to_string());
            credential.password = Some(credentials.password().to_string());
            credential.mechanism = Some(AuthMechanism::ScramSha1);
            options.credential = Some(credential);
        }
        let client = Client::with_options(options).map_err(connect_error)?;
        debug!("created MongoDB client for {uri}");
        Ok(MongoClient { client })
    }

    pub fn database(&self, name: &str) -> MongoDatabase {
        MongoDatabase {
            db: self.client.database(name),
        }
    }

    /// Round-trips a `ping` through the admin database.
    pub async fn ping(&self) -> Result<(), StoreError> {
        ping(&self.client.database(ADMIN_DATABASE)).await
    }

    pub async fn shutdown(self) {
        self.client.shutdown().await;
    }
}

/// Database handle bound under a `MongoClient`.
#[derive(Clone)]
pub struct MongoDatabase {
    db: Database,
}

impl MongoDatabase {
    pub fn name(&self) -> &str {
        self.db.name()
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        ping(&self.db).await
    }

    pub async fn insert_one(&self, collection: &str, document: Document) -> Result<Bson, StoreError> {
        let result = self
            .db
            .collection::<Document>(collection)
            .insert_one(document)
            .await
            .map_err(|e| StoreError::Insert {
                namespace: StoreError::namespace(self.name(), collection),
                message: e.to_string(),
            })?;
        Ok(result.inserted_id)
    }

    pub async fn insert_many(
        &self,
        collection: &str,
        documents: Vec<Document>,
    ) -> Result<Vec<Bson>, StoreError> {
        let count = documents.len();
        let mut result = self
            .db
            .collection::<Document>(collection)
            .insert_many(documents)
            .await
            .map_err(|e| StoreError::Insert {
                namespace: StoreError::namespace(self.name(), collection),
                message: e.to_string(),
            })?;
        // The driver keys ids by input position
        Ok((0..count)
            .filter_map(|index| result.inserted_ids.remove(&index))
            .collect())
    }

    /// Match-all find, drained into memory.
    pub async fn find_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let query_error = |e: mongodb::error::Error| StoreError::Query {
            namespace: StoreError::namespace(self.name(), collection),
            message: e.to_string(),
        };
        let cursor = self
            .db
            .collection::<Document>(collection)
            .find(doc! {})
            .await
            .map_err(query_error)?;
        cursor.try_collect::<Vec<Document>>().await.map_err(query_error)
    }

    pub async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> Result<UpdateSummary, StoreError> {
        let result = self
            .db
            .collection::<Document>(collection)
            .update_one(filter, update)
            .await
            .map_err(|e| StoreError::Update {
                namespace: StoreError::namespace(self.name(), collection),
                message: e.to_string(),
            })?;
        Ok(UpdateSummary {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    pub async fn update_many(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> Result<UpdateSummary, StoreError> {
        let result = self
            .db
            .collection::<Document>(collection)
            .update_many(filter, update)
            .await
            .map_err(|e| StoreError::Update {
                namespace: StoreError::namespace(self.name(), collection),
                message: e.to_string(),
            })?;
        Ok(UpdateSummary {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }
}

async fn ping(db: &Database) -> Result<(), StoreError> {
    db.run_command(doc! { "ping": 1 })
        .await
        .map(|_| ())
        .map_err(|e| StoreError::Ping {
            database: db.name().to_string(),
            message: e.to_string(),
        })
}

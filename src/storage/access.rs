//! Data-access helpers.
//!
//! Every helper looks the database up in the `ConnectionManager`, re-checks
//! liveness with a ping (connection health is never cached), converts records
//! through serde at the boundary, and then delegates to the backend.

use log::{debug, info};
use mongodb::bson::{self, oid::ObjectId, Bson};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error_handling::StoreError;
use crate::storage::backend::DatabaseHandle;
use crate::storage::connection::ConnectionManager;
use crate::storage::query::{FieldFilter, FieldUpdate, UpdateSummary};

async fn live_database<'a>(
    manager: &'a ConnectionManager,
    database: &str,
) -> Result<&'a DatabaseHandle, StoreError> {
    let handle = manager.database(database)?;
    handle.ping().await?;
    debug!("'{}' is live", handle.name());
    Ok(handle)
}

fn object_id(id: Bson) -> Option<ObjectId> {
    match id {
        Bson::ObjectId(oid) => Some(oid),
        _ => None,
    }
}

/// Inserts one record and returns the identifier the store assigned
/// (`None` if the record carried a non-ObjectId `_id`).
///
/// # Errors
///
/// Fails if the database is not bound, the ping fails, the record cannot be
/// encoded, or the store rejects the insert.
pub async fn insert_one<T: Serialize>(
    manager: &ConnectionManager,
    database: &str,
    collection: &str,
    record: &T,
) -> Result<Option<ObjectId>, StoreError> {
    let handle = live_database(manager, database).await?;
    let document = bson::to_document(record)?;
    let id = handle.insert_one(collection, document).await?;
    debug!("inserted {id} into '{database}.{collection}'");
    Ok(object_id(id))
}

/// Inserts a batch and returns the assigned identifiers in input order.
///
/// An empty batch returns immediately without touching the store.
///
/// # Errors
///
/// Same as [`insert_one`].
pub async fn insert_many<T: Serialize>(
    manager: &ConnectionManager,
    database: &str,
    collection: &str,
    records: &[T],
) -> Result<Vec<ObjectId>, StoreError> {
    if records.is_empty() {
        return Ok(Vec::new());
    }
    let handle = live_database(manager, database).await?;
    let documents = records
        .iter()
        .map(bson::to_document)
        .collect::<Result<Vec<_>, _>>()?;
    let ids = handle.insert_many(collection, documents).await?;
    info!(
        "inserted {} documents into '{database}.{collection}'",
        ids.len()
    );
    Ok(ids.into_iter().filter_map(object_id).collect())
}

/// Retrieves every document of a collection as records of type `T`.
///
/// `Ok` with an empty vector means the collection has no documents; every
/// failure is returned as an error.
///
/// # Errors
///
/// Fails if the database is not bound, the ping or the query fails, or a
/// document does not decode into `T`.
pub async fn retrieve_all<T: DeserializeOwned>(
    manager: &ConnectionManager,
    database: &str,
    collection: &str,
) -> Result<Vec<T>, StoreError> {
    let handle = live_database(manager, database).await?;
    let documents = handle.find_all(collection).await?;
    debug!(
        "retrieved {} documents from '{database}.{collection}'",
        documents.len()
    );
    documents
        .into_iter()
        .map(|document| bson::from_document(document).map_err(StoreError::from))
        .collect()
}

/// Applies `update` to the first document matching `filter`.
///
/// # Errors
///
/// Fails if the database is not bound, the ping fails, or the store rejects the update.
pub async fn update_one(
    manager: &ConnectionManager,
    database: &str,
    collection: &str,
    filter: &FieldFilter,
    update: &FieldUpdate,
) -> Result<UpdateSummary, StoreError> {
    let handle = live_database(manager, database).await?;
    let summary = handle
        .update_one(collection, filter.to_document(), update.to_document())
        .await?;
    info!(
        "updated one ({database})/({collection}) to ({update}) on matches of ({filter}): matched {}, modified {}",
        summary.matched, summary.modified
    );
    Ok(summary)
}

/// Applies `update` to every document matching `filter` in `database.collection`.
///
/// # Errors
///
/// Fails if the database is not bound, the ping fails, or the store rejects the update.
pub async fn update_many(
    manager: &ConnectionManager,
    database: &str,
    collection: &str,
    filter: &FieldFilter,
    update: &FieldUpdate,
) -> Result<UpdateSummary, StoreError> {
    let handle = live_database(manager, database).await?;
    let summary = handle
        .update_many(collection, filter.to_document(), update.to_document())
        .await?;
    info!(
        "updated many ({database})/({collection}) to ({update}) on matches of ({filter}): matched {}, modified {}",
        summary.matched, summary.modified
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryClient;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Probe {
        name: String,
    }

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Strict {
        altitude: i64,
    }

    async fn connected(client: MemoryClient) -> ConnectionManager {
        let mut manager = ConnectionManager::new("memory://", None);
        manager.connect_with(client).await.expect("connect");
        manager.connect_database("d").await.expect("bind");
        manager
    }

    #[tokio::test]
    async fn test_insert_after_outage_reports_ping_failure() {
        let client = MemoryClient::new();
        let manager = connected(client.clone()).await;
        client.set_reachable(false);

        let err = insert_one(&manager, "d", "c", &Probe { name: "x".into() })
            .await
            .expect_err("ping should fail");
        assert!(matches!(err, StoreError::Ping { .. }));
    }

    #[tokio::test]
    async fn test_retrieve_failure_is_not_an_empty_result() {
        let client = MemoryClient::new();
        let manager = connected(client.clone()).await;
        client.set_reachable(false);

        let result: Result<Vec<Probe>, _> = retrieve_all(&manager, "d", "c").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_retrieve_empty_collection_is_ok_and_empty() {
        let manager = connected(MemoryClient::new()).await;
        let records: Vec<Probe> = retrieve_all(&manager, "d", "missing")
            .await
            .expect("empty collection is not an error");
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_schema_mismatch_is_decode_error() {
        let manager = connected(MemoryClient::new()).await;
        insert_one(&manager, "d", "c", &Probe { name: "x".into() })
            .await
            .expect("insert");

        let err = retrieve_all::<Strict>(&manager, "d", "c")
            .await
            .expect_err("missing field should fail to decode");
        assert!(matches!(err, StoreError::Decode(_)));
    }

    #[tokio::test]
    async fn test_insert_many_empty_batch_skips_store() {
        let client = MemoryClient::new();
        let manager = connected(client.clone()).await;
        // Even an unreachable store is not contacted for an empty batch
        client.set_reachable(false);
        let ids = insert_many::<Probe>(&manager, "d", "c", &[])
            .await
            .expect("empty batch");
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn test_update_one_on_unbound_database() {
        let manager = connected(MemoryClient::new()).await;
        let err = update_one(
            &manager,
            "network",
            "access_ports",
            &FieldFilter::eq("name", "x"),
            &FieldUpdate::set("name", "y"),
        )
        .await
        .expect_err("network was never bound");
        assert!(matches!(err, StoreError::DatabaseNotConnected(ref name) if name == "network"));
    }
}

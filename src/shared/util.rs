use crate::shared::configuration::CONFIGURATION;
use azure_data_cosmos::prelude::*;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub async fn get_documents<T, S>(database: &DatabaseClient, collection_name: S) -> Option<Vec<T>>
where
    T: DeserializeOwned + Send + Sync + Clone,
    S: Into<std::borrow::Cow<'static, str>>,
{
    let collection = database.collection_client(collection_name);

    collection
        .list_documents()
        .into_stream::<T>()
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| tracing::error!("Failed to retrieve documents: {}", e))
        .ok()
        .and_then(|result| result.first().cloned())
        .map(|response| {
            response
                .documents
                .into_iter()
                .map(|document| document.document)
                .collect::<Vec<_>>()
        })
}

pub async fn query_document<T, S>(
    database: &DatabaseClient,
    collection_name: S,
    query: Query,
    cross_partition: bool,
) -> Option<Vec<T>>
where
    T: DeserializeOwned + Send + Sync + Clone,
    S: Into<std::borrow::Cow<'static, str>>,
{
    let collection = database.collection_client(collection_name);
    query_document_within_collection(&collection, query, cross_partition).await
}

pub async fn query_document_within_collection<T>(
    collection: &CollectionClient,
    query: Query,
    cross_partition: bool,
) -> Option<Vec<T>>
where
    T: DeserializeOwned + Send + Sync + Clone,
{
    let documents: Option<Vec<T>> = collection
        .query_documents(query)
        .query_cross_partition(cross_partition)
        .into_stream::<T>()
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| tracing::error!("Failed to retrieve document: {}", e))
        .ok()
        .and_then(|result| result.first().cloned())
        .map(|response| {
            response
                .results
                .into_iter()
                .map(|(document, _attributes)| document)
                .collect()
        });

    match documents {
        Some(documents) if !documents.is_empty() => Some(documents),
        _ => None,
    }
}

pub async fn add_document<S, D>(
    database: &DatabaseClient,
    collection_name: S,
    new_document: D,
) -> Result<CreateDocumentResponse, azure_core::error::Error>
where
    S: Into<std::borrow::Cow<'static, str>>,
    D: Serialize + CosmosEntity + Send + 'static,
{
    let collection = database.collection_client(collection_name);
    add_document_into_collection(&collection, new_document).await
}

pub async fn add_document_into_collection<D>(
    collection: &CollectionClient,
    new_document: D,
) -> Result<CreateDocumentResponse, azure_core::error::Error>
where
    D: Serialize + CosmosEntity + Send + 'static,
{
    collection
        .create_document(new_document)
        .is_upsert(true)
        .into_future()
        .await
}

pub fn initialize_clients() -> anyhow::Result<(CosmosClient, DatabaseClient)> {
    let authorization_token =
        AuthorizationToken::primary_key(&CONFIGURATION.cosmos_db_primary_key)?;

    let client = CosmosClient::new(
        CONFIGURATION.cosmos_db_account.clone(),
        authorization_token,
    );

    let database = client.database_client(&CONFIGURATION.cosmos_db_database_name);
    Ok((client, database))
}

//! HTTP adapter for an OpenSearch-compatible full-text engine.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use std::time::Duration;
use uuid::Uuid;

use super::{SearchDocument, SearchError, SearchIndex, SearchResult};
use crate::config::SearchConfig;

/// Search client backed by the engine's document REST API.
pub struct HttpSearchIndex {
    client: Client,
    base_url: String,
    environment: String,
}

impl HttpSearchIndex {
    /// Create a client from the search configuration.
    pub fn new(config: &SearchConfig) -> SearchResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            environment: config.environment.clone(),
        })
    }

    fn document_url(&self, index: &str, id: Uuid) -> String {
        // refresh=true so reads observe the write as soon as the request
        // returns; publish volume is low enough that this is affordable.
        format!("{}/{}/_doc/{}?refresh=true", self.base_url, index, id)
    }

    fn check(
        operation: &'static str,
        index: &str,
        status: StatusCode,
        missing_ok: bool,
    ) -> SearchResult<()> {
        if status.is_success() || (missing_ok && status == StatusCode::NOT_FOUND) {
            return Ok(());
        }
        Err(SearchError::Rejected {
            operation,
            index: index.to_string(),
            status: status.as_u16(),
        })
    }
}

#[async_trait]
impl SearchIndex for HttpSearchIndex {
    fn environment(&self) -> &str {
        &self.environment
    }

    async fn upsert(&self, index: &str, id: Uuid, document: &SearchDocument) -> SearchResult<()> {
        let response = self
            .client
            .put(self.document_url(index, id))
            .json(document)
            .send()
            .await?;

        Self::check("upsert", index, response.status(), false)?;

        tracing::debug!(index = %index, document_id = %id, "Upserted search document");
        Ok(())
    }

    async fn delete(&self, index: &str, id: Uuid) -> SearchResult<()> {
        let response = self
            .client
            .delete(self.document_url(index, id))
            .send()
            .await?;

        // An absent document or index means there is nothing to remove.
        Self::check("delete", index, response.status(), true)?;

        tracing::debug!(index = %index, document_id = %id, "Deleted search document");
        Ok(())
    }

    async fn bulk_delete(&self, index: &str, ids: &[Uuid]) -> SearchResult<()> {
        if ids.is_empty() {
            return Ok(());
        }

        let values: Vec<String> = ids.iter().map(Uuid::to_string).collect();
        let response = self
            .client
            .post(format!(
                "{}/{}/_delete_by_query?refresh=true",
                self.base_url, index
            ))
            .json(&json!({ "query": { "ids": { "values": values } } }))
            .send()
            .await?;

        Self::check("bulk_delete", index, response.status(), true)?;

        tracing::debug!(index = %index, count = ids.len(), "Bulk-deleted search documents");
        Ok(())
    }

    async fn delete_index(&self, index: &str) -> SearchResult<()> {
        let response = self
            .client
            .delete(format!("{}/{}", self.base_url, index))
            .send()
            .await?;

        Self::check("delete_index", index, response.status(), true)?;

        tracing::info!(index = %index, "Deleted search index");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryKind;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> HttpSearchIndex {
        HttpSearchIndex::new(&SearchConfig {
            base_url: server.uri(),
            environment: "test".to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    fn test_document(id: Uuid) -> SearchDocument {
        SearchDocument {
            entry_id: id,
            kind: EntryKind::Profession,
            name: "Farrier".to_string(),
            slug: Some("farrier".to_string()),
            summary: None,
            alternate_name: None,
        }
    }

    #[tokio::test]
    async fn test_upsert_puts_document() {
        let server = MockServer::start().await;
        let id = Uuid::new_v4();

        Mock::given(method("PUT"))
            .and(path(format!("/professions_test/_doc/{}", id)))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        client
            .upsert("professions_test", id, &test_document(id))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_upsert_rejected_surfaces_status() {
        let server = MockServer::start().await;
        let id = Uuid::new_v4();

        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = client
            .upsert("professions_test", id, &test_document(id))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SearchError::Rejected {
                operation: "upsert",
                status: 503,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_delete_tolerates_missing_document() {
        let server = MockServer::start().await;
        let id = Uuid::new_v4();

        Mock::given(method("DELETE"))
            .and(path(format!("/professions_test/_doc/{}", id)))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = test_client(&server);
        client.delete("professions_test", id).await.unwrap();
    }

    #[tokio::test]
    async fn test_bulk_delete_sends_ids_query() {
        let server = MockServer::start().await;
        let ids = vec![Uuid::new_v4(), Uuid::new_v4()];
        let values: Vec<String> = ids.iter().map(Uuid::to_string).collect();

        Mock::given(method("POST"))
            .and(path("/organisations_test/_delete_by_query"))
            .and(body_json(
                serde_json::json!({ "query": { "ids": { "values": values } } }),
            ))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        client.bulk_delete("organisations_test", &ids).await.unwrap();
    }

    #[tokio::test]
    async fn test_bulk_delete_skips_request_for_empty_batch() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = test_client(&server);
        client.bulk_delete("professions_test", &[]).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_index_tolerates_missing_index() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/professions_test"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        client.delete_index("professions_test").await.unwrap();
    }

    #[tokio::test]
    async fn test_environment_accessor() {
        let server = MockServer::start().await;
        let client = test_client(&server);
        assert_eq!(client.environment(), "test");
    }
}

//! Firestore adapter - Implements QuoteStore and TagStore using integration_firestore

use std::collections::HashMap;

use application::{
    error::ApplicationError,
    ports::{QuoteStore, TagStore},
};
use async_trait::async_trait;
use domain::{NewTag, Quote, QuoteId, Slug, Tag, TagId};
use integration_firestore::{
    Document, FieldOperator, FirestoreClient, FirestoreConfig, FirestoreError, StructuredQuery,
    Value,
};
use tracing::{debug, instrument};

const QUOTES: &str = "quotes";
const TAGS: &str = "tags";

/// Document store backed by Cloud Firestore
#[derive(Debug, Clone)]
pub struct FirestoreStore {
    client: FirestoreClient,
}

impl FirestoreStore {
    /// Create a store for the given project
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(config: FirestoreConfig) -> Result<Self, ApplicationError> {
        let client = FirestoreClient::new(config).map_err(Self::map_error)?;
        Ok(Self { client })
    }

    fn map_error(err: FirestoreError) -> ApplicationError {
        ApplicationError::ExternalService(format!("Firestore: {err}"))
    }

    /// Decode a quote document; missing fields decode as empty
    fn decode_quote(doc: &Document) -> Quote {
        let slugs = doc
            .string_array_field("slugs")
            .unwrap_or_default()
            .into_iter()
            .map(Slug::from_stored)
            .collect();

        Quote::from_stored(
            QuoteId::from_existing(doc.id()),
            doc.string_field("author").unwrap_or_default(),
            doc.string_field("quote").unwrap_or_default(),
            slugs,
        )
    }

    fn decode_tag(doc: &Document) -> Tag {
        Tag {
            id: TagId::new(doc.id()),
            name: doc.string_field("tag").unwrap_or_default().to_string(),
            slug: Slug::from_stored(doc.string_field("slug").unwrap_or_default()),
            image: doc.string_field("img").unwrap_or_default().to_string(),
        }
    }

    fn quote_fields(quote: &Quote) -> HashMap<String, Value> {
        HashMap::from([
            ("author".to_string(), Value::string(&quote.author)),
            ("quote".to_string(), Value::string(&quote.text)),
            (
                "slugs".to_string(),
                Value::string_array(quote.slugs.iter().map(Slug::as_str)),
            ),
        ])
    }

    fn tag_fields(tag: &NewTag) -> HashMap<String, Value> {
        HashMap::from([
            ("tag".to_string(), Value::string(&tag.name)),
            ("slug".to_string(), Value::string(tag.slug.as_str())),
            ("img".to_string(), Value::string(&tag.image)),
        ])
    }
}

#[async_trait]
impl QuoteStore for FirestoreStore {
    #[instrument(skip(self))]
    async fn list_quotes(&self) -> Result<Vec<Quote>, ApplicationError> {
        let docs = self
            .client
            .list_documents(QUOTES)
            .await
            .map_err(Self::map_error)?;
        Ok(docs.iter().map(Self::decode_quote).collect())
    }

    #[instrument(skip(self), fields(slug = %slug))]
    async fn find_quotes_by_slug(&self, slug: &Slug) -> Result<Vec<Quote>, ApplicationError> {
        let query = StructuredQuery::field_filter(
            QUOTES,
            "slugs",
            FieldOperator::ArrayContains,
            Value::string(slug.as_str()),
        );
        let docs = self.client.run_query(query).await.map_err(Self::map_error)?;
        Ok(docs.iter().map(Self::decode_quote).collect())
    }

    #[instrument(skip(self, quote), fields(quote_id = %quote.id))]
    async fn set_quote(&self, quote: &Quote) -> Result<(), ApplicationError> {
        self.client
            .set_document(QUOTES, quote.id.as_str(), Self::quote_fields(quote))
            .await
            .map_err(Self::map_error)?;
        debug!("Quote document written");
        Ok(())
    }
}

#[async_trait]
impl TagStore for FirestoreStore {
    #[instrument(skip(self))]
    async fn list_tags(&self) -> Result<Vec<Tag>, ApplicationError> {
        let docs = self
            .client
            .list_documents(TAGS)
            .await
            .map_err(Self::map_error)?;
        Ok(docs.iter().map(Self::decode_tag).collect())
    }

    #[instrument(skip(self, slugs), fields(count = slugs.len()))]
    async fn find_tags_by_slugs(&self, slugs: &[Slug]) -> Result<Vec<Tag>, ApplicationError> {
        if slugs.is_empty() {
            return Ok(Vec::new());
        }
        let query = StructuredQuery::field_filter(
            TAGS,
            "slug",
            FieldOperator::In,
            Value::string_array(slugs.iter().map(Slug::as_str)),
        );
        let docs = self.client.run_query(query).await.map_err(Self::map_error)?;
        Ok(docs.iter().map(Self::decode_tag).collect())
    }

    #[instrument(skip(self, tag), fields(slug = %tag.slug))]
    async fn add_tag(&self, tag: &NewTag) -> Result<TagId, ApplicationError> {
        let doc = self
            .client
            .add_document(TAGS, Self::tag_fields(tag))
            .await
            .map_err(Self::map_error)?;
        Ok(TagId::new(doc.id()))
    }
}

#[cfg(test)]
mod tests {
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_partial_json, method, path},
    };

    use super::*;

    const ROOT: &str = "/v1/projects/demo/databases/(default)/documents";

    async fn store(server: &MockServer) -> FirestoreStore {
        FirestoreStore::new(FirestoreConfig {
            base_url: format!("{}/v1", server.uri()),
            project_id: "demo".to_string(),
            ..FirestoreConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn decodes_quotes_leniently() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{ROOT}/quotes")))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "documents": [
                    {
                        "name": "projects/demo/databases/(default)/documents/quotes/q1",
                        "fields": {
                            "author": {"stringValue": "Seneca"},
                            "quote": {"stringValue": "Luck is preparation."},
                            "slugs": {"arrayValue": {"values": [{"stringValue": "wisdom"}]}}
                        }
                    },
                    {
                        "name": "projects/demo/databases/(default)/documents/quotes/q2",
                        "fields": {"quote": {"stringValue": "Orphan"}}
                    }
                ]
            })))
            .mount(&server)
            .await;

        let quotes = store(&server).await.list_quotes().await.unwrap();

        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].id.as_str(), "q1");
        assert_eq!(quotes[0].author, "Seneca");
        assert_eq!(quotes[0].slugs, vec![Slug::from_stored("wisdom")]);
        assert_eq!(quotes[1].author, "");
        assert!(quotes[1].slugs.is_empty());
    }

    #[tokio::test]
    async fn slug_lookup_uses_in_filter() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("{ROOT}:runQuery")))
            .and(body_partial_json(serde_json::json!({
                "structuredQuery": {"where": {"fieldFilter": {
                    "field": {"fieldPath": "slug"},
                    "op": "IN"
                }}}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "document": {
                    "name": "projects/demo/databases/(default)/documents/tags/t1",
                    "fields": {
                        "tag": {"stringValue": "Wisdom"},
                        "slug": {"stringValue": "wisdom"},
                        "img": {"stringValue": "w.png"}
                    }
                }
            }])))
            .expect(1)
            .mount(&server)
            .await;

        let tags = store(&server)
            .await
            .find_tags_by_slugs(&[Slug::from_stored("wisdom"), Slug::from_stored("nope")])
            .await
            .unwrap();

        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].id.as_str(), "t1");
        assert_eq!(tags[0].name, "Wisdom");
        assert_eq!(tags[0].image, "w.png");
    }

    #[tokio::test]
    async fn empty_slug_lookup_skips_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let tags = store(&server).await.find_tags_by_slugs(&[]).await.unwrap();

        assert!(tags.is_empty());
    }

    #[tokio::test]
    async fn set_quote_writes_at_quote_id() {
        let server = MockServer::start().await;
        let quote = Quote::new("Author", "Words", vec![Slug::from_stored("a")]).unwrap();

        Mock::given(method("PATCH"))
            .and(path(format!("{ROOT}/quotes/{}", quote.id)))
            .and(body_partial_json(serde_json::json!({
                "fields": {
                    "author": {"stringValue": "Author"},
                    "quote": {"stringValue": "Words"},
                    "slugs": {"arrayValue": {"values": [{"stringValue": "a"}]}}
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": format!("projects/demo/databases/(default)/documents/quotes/{}", quote.id)
            })))
            .expect(1)
            .mount(&server)
            .await;

        store(&server).await.set_quote(&quote).await.unwrap();
    }

    #[tokio::test]
    async fn add_tag_returns_generated_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("{ROOT}/tags")))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "projects/demo/databases/(default)/documents/tags/AbCdEfGhIjKlMnOpQrSt"
            })))
            .mount(&server)
            .await;

        let tag = NewTag::new("Wisdom", "wisdom", "w.png").unwrap();
        let id = store(&server).await.add_tag(&tag).await.unwrap();

        assert_eq!(id.as_str(), "AbCdEfGhIjKlMnOpQrSt");
    }

    #[tokio::test]
    async fn firestore_failure_is_external_service_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let result = store(&server).await.list_tags().await;

        assert!(matches!(result, Err(ApplicationError::ExternalService(_))));
    }
}

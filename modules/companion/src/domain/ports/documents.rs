use async_trait::async_trait;
use serde_json::Value;

/// Schemaless document body, keyed by field name.
pub type Document = serde_json::Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// A stored document together with its id.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    pub id: String,
    pub data: Document,
}

/// `query(collection, equality-filter, order-by, limit)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub collection: String,
    pub filter: Option<(String, Value)>,
    pub order_by: Option<(String, Direction)>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn collection(name: impl Into<String>) -> Self {
        Self {
            collection: name.into(),
            filter: None,
            order_by: None,
            limit: None,
        }
    }

    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter = Some((field.into(), value.into()));
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some((field.into(), direction));
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }
}

/// Port for the managed document database. Only the subset the services
/// need is modelled. Documents that lack the `order_by` field are not
/// returned by ordered queries.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create a document; fails if `id` already exists in `collection`.
    async fn insert(&self, collection: &str, id: &str, doc: Document) -> anyhow::Result<()>;
    async fn get(&self, collection: &str, id: &str) -> anyhow::Result<Option<Document>>;
    /// Write a document. With `merge`, fields in `doc` overwrite and the rest are kept.
    async fn set(&self, collection: &str, id: &str, doc: Document, merge: bool)
        -> anyhow::Result<()>;
    async fn query(&self, query: &Query) -> anyhow::Result<Vec<DocumentSnapshot>>;
}

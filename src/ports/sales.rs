use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::Sale;

/// Persistence gateway for [`Sale`] records
#[mockall::automock]
#[async_trait::async_trait]
pub trait SalesPort: Send + Sync {
    /// All stored sales
    async fn find_all(&self) -> Result<Vec<Sale>, Error>;

    /// A single sale, or `None` when the id is unknown
    async fn find_by_id(&self, sale_id: Uuid) -> Result<Option<Sale>, Error>;

    /// Sales with `from <= datetime <= to`, ordered by datetime ascending
    async fn find_by_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Sale>, Error>;

    /// Insert the sale, replacing any record with the same id
    ///
    /// Returns the stored record, or `None` when the write yielded no result.
    async fn save(&self, sale: Sale) -> Result<Option<Sale>, Error>;

    /// Remove the sale and return it, or `None` when the id is unknown
    ///
    /// The removal is awaited: a failure here reaches the caller instead of
    /// being dropped on the floor.
    async fn delete_by_id(&self, sale_id: Uuid) -> Result<Option<Sale>, Error>;
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Concrete adapter errors
    ///
    /// This could represent any errors from a concrete adapter that is not part of the domain
    /// model, such as connectivity, configuration, or permission errors.
    #[error("adapter error: {0:?}")]
    Adapter(Box<dyn std::error::Error + Send + Sync>),
}

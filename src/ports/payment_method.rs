use crate::domain::PaymentMethod;

/// Read-only gateway to the payment-method catalog
#[mockall::automock]
#[async_trait::async_trait]
pub trait PaymentMethodPort: Send + Sync {
    /// The payment method with the given name, or `None` when unknown
    async fn find_by_name(&self, name: &str) -> Result<Option<PaymentMethod>, Error>;
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

use crate::{
    domain::{PaymentMethod, Sale},
    ports::{payment_method, sales},
};
use chrono::{DateTime, Utc};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};
use uuid::Uuid;

/// In-memory persistence gateway
///
/// Backs both the sales store and the read-only payment-method catalog, which
/// is populated up front through [`MemoryDatabase::register_payment_method`].
#[derive(Clone, Debug)]
pub struct MemoryDatabase {
    sales: Arc<Mutex<HashMap<Uuid, Sale>>>,
    payment_methods: Arc<Mutex<HashMap<String, PaymentMethod>>>,
}

impl MemoryDatabase {
    /// Add a payment method to the catalog
    ///
    /// Seeding-time operation; the ports expose the catalog read-only.
    pub fn register_payment_method(
        &self,
        payment_method: PaymentMethod,
    ) -> Result<(), payment_method::Error> {
        self.payment_methods
            .lock()?
            .insert(payment_method.name.clone(), payment_method);
        Ok(())
    }
}

#[async_trait::async_trait]
impl sales::SalesPort for MemoryDatabase {
    async fn find_all(&self) -> Result<Vec<Sale>, sales::Error> {
        let mut all: Vec<Sale> = self.sales.lock()?.values().cloned().collect();
        all.sort_by_key(|sale| sale.datetime);
        Ok(all)
    }

    async fn find_by_id(&self, sale_id: Uuid) -> Result<Option<Sale>, sales::Error> {
        Ok(self.sales.lock()?.get(&sale_id).cloned())
    }

    async fn find_by_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Sale>, sales::Error> {
        let mut in_range: Vec<Sale> = self
            .sales
            .lock()?
            .values()
            .filter(|sale| from <= sale.datetime && sale.datetime <= to)
            .cloned()
            .collect();
        in_range.sort_by_key(|sale| sale.datetime);
        Ok(in_range)
    }

    async fn save(&self, sale: Sale) -> Result<Option<Sale>, sales::Error> {
        self.sales.lock()?.insert(sale.sale_id, sale.clone());
        Ok(Some(sale))
    }

    async fn delete_by_id(&self, sale_id: Uuid) -> Result<Option<Sale>, sales::Error> {
        Ok(self.sales.lock()?.remove(&sale_id))
    }
}

#[async_trait::async_trait]
impl payment_method::PaymentMethodPort for MemoryDatabase {
    async fn find_by_name(&self, name: &str) -> Result<Option<PaymentMethod>, payment_method::Error> {
        Ok(self.payment_methods.lock()?.get(name).cloned())
    }
}

impl Default for MemoryDatabase {
    fn default() -> Self {
        Self {
            sales: Arc::new(Mutex::new(HashMap::new())),
            payment_methods: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

/// Erased [`PoisonError`]
///
/// `PoisonError` keeps the `MutexGuard` internally, which is not send. Thus we erase the error
/// and only keep the string representation instead.
#[derive(Debug, thiserror::Error)]
#[error("poison error: {0}")]
pub struct ErasedPoisonError(String);

/// We need to create a custom `From` implementation here for an error that's specific to this
/// adapter.
impl<T> From<PoisonError<T>> for sales::Error {
    fn from(err: PoisonError<T>) -> Self {
        Self::Adapter(Box::new(ErasedPoisonError(err.to_string())))
    }
}

impl<T> From<PoisonError<T>> for payment_method::Error {
    fn from(err: PoisonError<T>) -> Self {
        Self::Adapter(Box::new(ErasedPoisonError(err.to_string())))
    }
}

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{domain::Sale, ports::sales::SalesPort};
use tower::Service;
use uuid::Uuid;

use super::{DomainLogic, Error};

/// Request to delete a sale by id
///
/// The removal is awaited end to end, so a gateway failure after the lookup
/// reaches the caller instead of being silently dropped.
pub struct DeleteSaleRequest {
    pub sale_id: Uuid,
}

impl<S, P> Service<DeleteSaleRequest> for DomainLogic<S, P>
where
    S: SalesPort + 'static,
    P: Send + Sync + 'static,
{
    type Response = Sale;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: DeleteSaleRequest) -> Self::Future {
        let sales = self.sales.clone();
        Box::pin(async move {
            tracing::debug!(sale_id = %req.sale_id, "deleting sale");
            sales.delete_by_id(req.sale_id).await?.ok_or_else(|| {
                tracing::error!(sale_id = %req.sale_id, "no sale with this id");
                Error::SaleNotFound(req.sale_id)
            })
        })
    }
}

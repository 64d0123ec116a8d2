use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{domain::Sale, ports::sales::SalesPort};
use tower::Service;
use uuid::Uuid;

use super::{DomainLogic, Error};

/// Request for every stored sale
pub struct GetAllSalesRequest;

/// Request for a single sale by id
pub struct GetSaleByIdRequest {
    pub sale_id: Uuid,
}

impl<S, P> Service<GetAllSalesRequest> for DomainLogic<S, P>
where
    S: SalesPort + 'static,
    P: Send + Sync + 'static,
{
    type Response = Vec<Sale>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _req: GetAllSalesRequest) -> Self::Future {
        let sales = self.sales.clone();
        Box::pin(async move {
            tracing::debug!("fetching all sales");
            let all = sales.find_all().await?;
            // An empty store is reported explicitly, never as an empty success
            if all.is_empty() {
                tracing::error!("no sales recorded");
                return Err(Error::NoSales);
            }
            Ok(all)
        })
    }
}

impl<S, P> Service<GetSaleByIdRequest> for DomainLogic<S, P>
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

    fn call(&mut self, req: GetSaleByIdRequest) -> Self::Future {
        let sales = self.sales.clone();
        Box::pin(async move {
            tracing::debug!(sale_id = %req.sale_id, "fetching sale by id");
            sales.find_by_id(req.sale_id).await?.ok_or_else(|| {
                tracing::error!(sale_id = %req.sale_id, "no sale with this id");
                Error::SaleNotFound(req.sale_id)
            })
        })
    }
}

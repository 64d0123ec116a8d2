use std::{
    collections::BTreeMap,
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{
    domain::{Sale, SalesBucket},
    ports::sales::SalesPort,
};
use chrono::{DateTime, Duration, DurationRound, Utc};
use rust_decimal::Decimal;
use tower::Service;

use super::{DomainLogic, Error};

/// Request for the hourly sales report over `[from, to]`
pub struct SalesByRangeRequest {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl<S, P> Service<SalesByRangeRequest> for DomainLogic<S, P>
where
    S: SalesPort + 'static,
    P: Send + Sync + 'static,
{
    type Response = Vec<SalesBucket>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: SalesByRangeRequest) -> Self::Future {
        let sales = self.sales.clone();
        Box::pin(async move {
            tracing::debug!(from = %req.from, to = %req.to, "aggregating sales by range");
            let in_range = sales.find_by_range(req.from, req.to).await?;
            // A range with no sales is reported explicitly, never as an empty list
            if in_range.is_empty() {
                tracing::error!(from = %req.from, to = %req.to, "no sales in range");
                return Err(Error::EmptyRange {
                    from: req.from,
                    to: req.to,
                });
            }
            bucket_by_hour(&in_range)
        })
    }
}

/// Timestamp with minutes and everything below zeroed out
fn truncate_to_hour(datetime: DateTime<Utc>) -> Result<DateTime<Utc>, Error> {
    datetime
        .duration_trunc(Duration::hours(1))
        .map_err(|err| Error::InvalidState(err.to_string().into()))
}

/// Group sales into hour-aligned buckets, summing prices and points per bucket
///
/// Buckets come out ascending by timestamp; the `BTreeMap` keeps the keys
/// unique and sorted.
fn bucket_by_hour(sales: &[Sale]) -> Result<Vec<SalesBucket>, Error> {
    let mut buckets: BTreeMap<DateTime<Utc>, SalesBucket> = BTreeMap::new();
    for sale in sales {
        let key = truncate_to_hour(sale.datetime)?;
        let bucket = buckets.entry(key).or_insert_with(|| SalesBucket {
            datetime: key,
            sales: Decimal::ZERO,
            points: Decimal::ZERO,
        });
        bucket.sales += sale.final_price;
        bucket.points += sale.points;
    }
    Ok(buckets.into_values().collect())
}

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{
    domain::{PaymentMethod, Sale},
    ports::{payment_method::PaymentMethodPort, sales::SalesPort},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tower::Service;
use uuid::Uuid;

use super::{DomainLogic, Error};

/// Request to record a sale
///
/// Also used for updates: when `sale_id` is set, the stored record with that
/// id is replaced instead of a new one being inserted.
pub struct AddSaleRequest {
    pub sale_id: Option<Uuid>,
    /// Base price before any modifier is applied
    pub price: Decimal,
    /// Requested price modifier; must fall within the payment method's range
    pub price_modifier: Decimal,
    /// Name of the payment method, resolved against the catalog
    pub payment_method: String,
    pub datetime: DateTime<Utc>,
}

#[derive(Debug, PartialEq)]
pub struct AddSaleResponse {
    /// `price * price_modifier`, unrounded
    pub final_price: Decimal,
    /// `price * points_modifier` of the payment method
    pub points: Decimal,
}

impl<S, P> Service<AddSaleRequest> for DomainLogic<S, P>
where
    S: SalesPort + 'static,
    P: PaymentMethodPort + 'static,
{
    type Response = AddSaleResponse;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: AddSaleRequest) -> Self::Future {
        let sales = self.sales.clone();
        let payment_methods = self.payment_methods.clone();
        Box::pin(async move {
            // Resolve the payment method by name
            let payment_method = payment_methods
                .find_by_name(&req.payment_method)
                .await?
                .ok_or_else(|| {
                    tracing::error!(payment_method = %req.payment_method, "unknown payment method");
                    Error::UnknownPaymentMethod(req.payment_method.clone())
                })?;

            // The requested modifier must fall within the method's range
            if !payment_method.allows_modifier(req.price_modifier) {
                tracing::error!(
                    payment_method = %payment_method.name,
                    modifier = %req.price_modifier,
                    "price modifier outside the allowed range"
                );
                return Err(Error::PriceModifierOutOfRange {
                    modifier: req.price_modifier,
                    from: payment_method.price_modifier_from,
                    to: payment_method.price_modifier_to,
                });
            }

            // Compute and store the sale
            let sale = build_sale(&req, &payment_method);
            let stored = sales.save(sale).await?.ok_or_else(|| {
                tracing::error!("persistence yielded no record for the sale");
                Error::WriteAborted
            })?;

            Ok(AddSaleResponse {
                final_price: stored.final_price,
                points: stored.points,
            })
        })
    }
}

/// Sale record for a validated request
///
/// Prices and points are decimal products; no rounding happens here.
fn build_sale(req: &AddSaleRequest, payment_method: &PaymentMethod) -> Sale {
    Sale {
        sale_id: req.sale_id.unwrap_or_else(Uuid::new_v4),
        final_price: req.price * req.price_modifier,
        points: req.price * payment_method.points_modifier,
        payment_method_id: payment_method.payment_method_id,
        datetime: req.datetime,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        adapters::database::memory::MemoryDatabase,
        ports::{payment_method::MockPaymentMethodPort, sales::MockSalesPort},
    };
    use rstest::*;
    use rust_decimal_macros::dec;
    use speculoos::prelude::*;
    use std::sync::Arc;
    use tower::{BoxError, ServiceExt};

    #[fixture]
    fn cash() -> PaymentMethod {
        PaymentMethod {
            payment_method_id: Uuid::new_v4(),
            name: "CASH".to_string(),
            price_modifier_from: dec!(0.90),
            price_modifier_to: dec!(1.02),
            points_modifier: dec!(0.05),
        }
    }

    fn request(price: Decimal, price_modifier: Decimal) -> AddSaleRequest {
        AddSaleRequest {
            sale_id: None,
            price,
            price_modifier,
            payment_method: "CASH".to_string(),
            datetime: Utc::now(),
        }
    }

    /// Final price and points are exact decimal products
    #[rstest]
    #[case(dec!(100), dec!(0.95), dec!(95.00), dec!(5.00))]
    #[case(dec!(100), dec!(1.02), dec!(102.00), dec!(5.00))]
    #[case(dec!(33.33), dec!(1.00), dec!(33.3300), dec!(1.6665))]
    fn test_build_sale(
        cash: PaymentMethod,
        #[case] price: Decimal,
        #[case] price_modifier: Decimal,
        #[case] final_price: Decimal,
        #[case] points: Decimal,
    ) {
        let sale = build_sale(&request(price, price_modifier), &cash);

        assert_that!(sale.final_price).is_equal_to(final_price);
        assert_that!(sale.points).is_equal_to(points);
        assert_that!(sale.payment_method_id).is_equal_to(cash.payment_method_id);
    }

    #[rstest]
    #[tokio::test]
    async fn test_call(cash: PaymentMethod) -> Result<(), BoxError> {
        // GIVEN
        // * a catalog that resolves CASH
        // * an empty sales store
        let mut payment_methods = MockPaymentMethodPort::new();
        let catalog_entry = cash.clone();
        payment_methods
            .expect_find_by_name()
            .times(1)
            .withf(|name| name == "CASH")
            .returning(move |_| Ok(Some(catalog_entry.clone())));
        let database = MemoryDatabase::default();

        let logic = DomainLogic::new(Arc::new(database.clone()), Arc::new(payment_methods));

        // WHEN recording a sale of 100 at modifier 0.95
        let res = logic
            .clone()
            .oneshot(request(dec!(100), dec!(0.95)))
            .await;

        // THEN
        // * the computed price and points are exact
        // * the sale is persisted
        assert_that!(res).is_ok().is_equal_to(AddSaleResponse {
            final_price: dec!(95.00),
            points: dec!(5.00),
        });
        let stored = crate::ports::sales::SalesPort::find_all(&database).await?;
        assert_that!(stored).has_length(1);
        assert_that!(stored[0].final_price).is_equal_to(dec!(95.00));
        Arc::into_inner(logic.payment_methods).unwrap().checkpoint();

        Ok(())
    }

    #[rstest]
    #[case(dec!(0.89))]
    #[case(dec!(1.03))]
    #[tokio::test]
    async fn test_call_out_of_range_persists_nothing(
        cash: PaymentMethod,
        #[case] price_modifier: Decimal,
    ) -> Result<(), BoxError> {
        let mut payment_methods = MockPaymentMethodPort::new();
        let catalog_entry = cash.clone();
        payment_methods
            .expect_find_by_name()
            .returning(move |_| Ok(Some(catalog_entry.clone())));
        let database = MemoryDatabase::default();

        let logic = DomainLogic::new(Arc::new(database.clone()), Arc::new(payment_methods));

        let res = logic.oneshot(request(dec!(100), price_modifier)).await;

        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, Error::PriceModifierOutOfRange { .. }));
        let stored = crate::ports::sales::SalesPort::find_all(&database).await?;
        assert_that!(stored).is_empty();

        Ok(())
    }

    /// The modifier range is inclusive at both ends
    #[rstest]
    #[case(dec!(0.90), dec!(90.00))]
    #[case(dec!(1.02), dec!(102.00))]
    #[tokio::test]
    async fn test_call_accepts_boundary_modifiers(
        cash: PaymentMethod,
        #[case] price_modifier: Decimal,
        #[case] final_price: Decimal,
    ) -> Result<(), BoxError> {
        let mut payment_methods = MockPaymentMethodPort::new();
        let catalog_entry = cash.clone();
        payment_methods
            .expect_find_by_name()
            .returning(move |_| Ok(Some(catalog_entry.clone())));
        let database = MemoryDatabase::default();

        let logic = DomainLogic::new(Arc::new(database.clone()), Arc::new(payment_methods));

        let res = logic.oneshot(request(dec!(100), price_modifier)).await;

        assert_that!(res).is_ok().is_equal_to(AddSaleResponse {
            final_price,
            points: dec!(5.00),
        });
        let stored = crate::ports::sales::SalesPort::find_all(&database).await?;
        assert_that!(stored).has_length(1);

        Ok(())
    }

    #[tokio::test]
    async fn test_call_unknown_payment_method() -> Result<(), BoxError> {
        let mut payment_methods = MockPaymentMethodPort::new();
        payment_methods
            .expect_find_by_name()
            .returning(|_| Ok(None));
        let database = MemoryDatabase::default();

        let logic = DomainLogic::new(Arc::new(database), Arc::new(payment_methods));

        let mut req = request(dec!(100), dec!(0.95));
        req.payment_method = "BITCOIN".to_string();
        let res = logic.oneshot(req).await;

        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, Error::UnknownPaymentMethod(name) if name == "BITCOIN"));

        Ok(())
    }

    #[rstest]
    #[tokio::test]
    async fn test_call_update_replaces_record(cash: PaymentMethod) -> Result<(), BoxError> {
        let mut payment_methods = MockPaymentMethodPort::new();
        let catalog_entry = cash.clone();
        payment_methods
            .expect_find_by_name()
            .returning(move |_| Ok(Some(catalog_entry.clone())));
        let database = MemoryDatabase::default();

        let logic = DomainLogic::new(Arc::new(database.clone()), Arc::new(payment_methods));

        let res = logic
            .clone()
            .oneshot(request(dec!(100), dec!(0.95)))
            .await;
        assert_that!(res).is_ok();
        let stored = crate::ports::sales::SalesPort::find_all(&database).await?;
        let sale_id = stored[0].sale_id;

        // Replaying the request with the stored id replaces instead of inserting
        let mut req = request(dec!(200), dec!(1.00));
        req.sale_id = Some(sale_id);
        let res = logic.oneshot(req).await;

        assert_that!(res).is_ok().is_equal_to(AddSaleResponse {
            final_price: dec!(200.00),
            points: dec!(10.00),
        });
        let stored = crate::ports::sales::SalesPort::find_all(&database).await?;
        assert_that!(stored).has_length(1);
        assert_that!(stored[0].sale_id).is_equal_to(sale_id);
        assert_that!(stored[0].final_price).is_equal_to(dec!(200.00));

        Ok(())
    }

    #[rstest]
    #[tokio::test]
    async fn test_call_write_aborted(cash: PaymentMethod) -> Result<(), BoxError> {
        let mut payment_methods = MockPaymentMethodPort::new();
        let catalog_entry = cash.clone();
        payment_methods
            .expect_find_by_name()
            .returning(move |_| Ok(Some(catalog_entry.clone())));
        // A gateway that accepts the write but yields no record
        let mut sales = MockSalesPort::new();
        sales.expect_save().times(1).returning(|_| Ok(None));

        let logic = DomainLogic::new(Arc::new(sales), Arc::new(payment_methods));

        let res = logic.oneshot(request(dec!(100), dec!(0.95))).await;

        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, Error::WriteAborted));

        Ok(())
    }
}

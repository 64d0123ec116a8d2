use async_graphql::{
    Context, EmptySubscription, ErrorExtensions, InputObject, Object, Result, Schema,
};
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use tower::ServiceExt;
use uuid::Uuid;

use crate::{
    commands::{
        add_sale::{AddSaleRequest, AddSaleResponse},
        delete_sale::DeleteSaleRequest,
        get_sales::{GetAllSalesRequest, GetSaleByIdRequest},
        sales_by_range::SalesByRangeRequest,
        Error,
    },
    domain::{Sale, SalesBucket},
};

use super::SalesLogic;

pub type SalesSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(logic: SalesLogic) -> SalesSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(logic)
        .finish()
}

/// Errors carry their classification in the `errorType` extension so clients
/// can react without parsing the message text.
impl ErrorExtensions for Error {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string())
            .extend_with(|_, e| e.set("errorType", self.kind().as_str()))
    }
}

/// Serialization format for timestamps: `yyyy-MM-dd'T'HH:mm:ss.SSSZ`
fn format_datetime(datetime: DateTime<Utc>) -> String {
    datetime.format("%Y-%m-%dT%H:%M:%S%.3f%z").to_string()
}

#[derive(InputObject)]
pub struct SalesInput {
    pub price: Decimal,
    pub price_modifier: Decimal,
    /// Payment method name, e.g. `CASH` or `VISA`
    pub payment_method: String,
    pub datetime: DateTime<Utc>,
}

impl SalesInput {
    fn into_request(self, sale_id: Option<Uuid>) -> AddSaleRequest {
        AddSaleRequest {
            sale_id,
            price: self.price,
            price_modifier: self.price_modifier,
            payment_method: self.payment_method,
            datetime: self.datetime,
        }
    }
}

#[derive(InputObject)]
pub struct DateRangeInput {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

pub struct SaleObject(Sale);

#[Object(name = "Sale")]
impl SaleObject {
    async fn id(&self) -> Uuid {
        self.0.sale_id
    }

    async fn final_price(&self) -> Decimal {
        self.0.final_price
    }

    async fn points(&self) -> Decimal {
        self.0.points
    }

    async fn payment_method_id(&self) -> Uuid {
        self.0.payment_method_id
    }

    async fn datetime(&self) -> String {
        format_datetime(self.0.datetime)
    }
}

pub struct SalesBucketObject(SalesBucket);

#[Object(name = "SalesBucket")]
impl SalesBucketObject {
    /// Start of the hour this bucket covers
    async fn datetime(&self) -> String {
        format_datetime(self.0.datetime)
    }

    async fn sales(&self) -> Decimal {
        self.0.sales
    }

    async fn points(&self) -> Decimal {
        self.0.points
    }
}

pub struct SaleReceipt(AddSaleResponse);

#[Object(name = "SaleReceipt")]
impl SaleReceipt {
    /// Final price rounded half-up to whole units
    ///
    /// Rounding happens only here; the stored value keeps its full precision.
    async fn final_price(&self) -> Decimal {
        self.0
            .final_price
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    }

    async fn points(&self) -> Decimal {
        self.0.points
    }
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn get_all_sales(&self, ctx: &Context<'_>) -> Result<Vec<SaleObject>> {
        tracing::debug!("query getAllSales");
        let logic = ctx.data_unchecked::<SalesLogic>().clone();
        let sales = logic
            .oneshot(GetAllSalesRequest)
            .await
            .map_err(|err| err.extend())?;
        Ok(sales.into_iter().map(SaleObject).collect())
    }

    async fn get_sale_by_id(&self, ctx: &Context<'_>, id: Uuid) -> Result<SaleObject> {
        tracing::debug!(%id, "query getSaleById");
        let logic = ctx.data_unchecked::<SalesLogic>().clone();
        let sale = logic
            .oneshot(GetSaleByIdRequest { sale_id: id })
            .await
            .map_err(|err| err.extend())?;
        Ok(SaleObject(sale))
    }

    async fn get_sales_by_range(
        &self,
        ctx: &Context<'_>,
        date_range_input: DateRangeInput,
    ) -> Result<Vec<SalesBucketObject>> {
        tracing::debug!(from = %date_range_input.from, to = %date_range_input.to, "query getSalesByRange");
        let logic = ctx.data_unchecked::<SalesLogic>().clone();
        let buckets = logic
            .oneshot(SalesByRangeRequest {
                from: date_range_input.from,
                to: date_range_input.to,
            })
            .await
            .map_err(|err| err.extend())?;
        Ok(buckets.into_iter().map(SalesBucketObject).collect())
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn add_sale(&self, ctx: &Context<'_>, sales_input: SalesInput) -> Result<SaleReceipt> {
        tracing::debug!(payment_method = %sales_input.payment_method, "mutation addSale");
        let logic = ctx.data_unchecked::<SalesLogic>().clone();
        let receipt = logic
            .oneshot(sales_input.into_request(None))
            .await
            .map_err(|err| err.extend())?;
        Ok(SaleReceipt(receipt))
    }

    async fn update_sale(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        sales_input: SalesInput,
    ) -> Result<SaleReceipt> {
        tracing::debug!(%id, "mutation updateSale");
        let logic = ctx.data_unchecked::<SalesLogic>().clone();
        let receipt = logic
            .oneshot(sales_input.into_request(Some(id)))
            .await
            .map_err(|err| err.extend())?;
        Ok(SaleReceipt(receipt))
    }

    async fn delete_sale_by_id(&self, ctx: &Context<'_>, id: Uuid) -> Result<SaleObject> {
        tracing::debug!(%id, "mutation deleteSaleById");
        let logic = ctx.data_unchecked::<SalesLogic>().clone();
        let sale = logic
            .oneshot(DeleteSaleRequest { sale_id: id })
            .await
            .map_err(|err| err.extend())?;
        Ok(SaleObject(sale))
    }
}

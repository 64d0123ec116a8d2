use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// A persisted sale transaction
#[derive(Clone, Debug, PartialEq)]
pub struct Sale {
    /// Unique identifier for the `Sale`
    pub sale_id: Uuid,
    /// Price after applying the payment method's price modifier
    ///
    /// Stored unrounded; rounding happens at the response-formatting boundary.
    pub final_price: Decimal,
    /// Loyalty points earned by this sale
    pub points: Decimal,
    /// Identifier of the payment method the sale was made with
    pub payment_method_id: Uuid,
    /// When the sale took place
    pub datetime: DateTime<Utc>,
}

/// A named modifier profile for a way of paying
///
/// Payment methods are read-only from this service's perspective: they bound
/// the price modifiers a caller may request and define the points rate.
#[derive(Clone, Debug, PartialEq)]
pub struct PaymentMethod {
    pub payment_method_id: Uuid,
    pub name: String,
    /// Lower bound (inclusive) of the accepted price modifier
    pub price_modifier_from: Decimal,
    /// Upper bound (inclusive) of the accepted price modifier
    pub price_modifier_to: Decimal,
    /// Rate applied to the price to compute loyalty points
    pub points_modifier: Decimal,
}

impl PaymentMethod {
    /// Whether the requested price modifier falls within the accepted range
    pub fn allows_modifier(&self, price_modifier: Decimal) -> bool {
        self.price_modifier_from <= price_modifier && price_modifier <= self.price_modifier_to
    }
}

/// Hourly aggregate of sales for reporting
///
/// Derived from a list of sales; never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct SalesBucket {
    /// Start of the hour this bucket covers
    pub datetime: DateTime<Utc>,
    /// Sum of final prices in this hour
    pub sales: Decimal,
    /// Sum of points earned in this hour
    pub points: Decimal,
}

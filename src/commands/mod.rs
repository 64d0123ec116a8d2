use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::{borrow::Cow, sync::Arc};
use uuid::Uuid;

pub mod add_sale;
pub mod delete_sale;
pub mod get_sales;
pub mod sales_by_range;

/// Business logic over the persistence ports
///
/// Each operation is exposed as a [`tower::Service`] implementation in its own
/// module. Cloning is cheap; the ports are shared behind [`Arc`]s.
pub struct DomainLogic<S, P> {
    sales: Arc<S>,
    payment_methods: Arc<P>,
}

impl<S, P> DomainLogic<S, P> {
    pub fn new(sales: Arc<S>, payment_methods: Arc<P>) -> Self {
        Self {
            sales,
            payment_methods,
        }
    }
}

impl<S, P> Clone for DomainLogic<S, P> {
    fn clone(&self) -> Self {
        Self {
            sales: self.sales.clone(),
            payment_methods: self.payment_methods.clone(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("sales port error: {0:?}")]
    Sales(#[from] crate::ports::sales::Error),
    #[error("payment method port error: {0:?}")]
    PaymentMethods(#[from] crate::ports::payment_method::Error),

    /// The requested payment method does not exist in the catalog
    #[error("payment method '{0}' is not supported")]
    UnknownPaymentMethod(String),

    /// The requested price modifier falls outside the payment method's range
    #[error("price modifier {modifier} is outside the allowed range [{from}, {to}]")]
    PriceModifierOutOfRange {
        modifier: Decimal,
        from: Decimal,
        to: Decimal,
    },

    #[error("no sale found with id {0}")]
    SaleNotFound(Uuid),

    #[error("no sales have been recorded yet")]
    NoSales,

    #[error("no sales recorded between {from} and {to}")]
    EmptyRange {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },

    /// The gateway accepted the write but yielded no stored record
    #[error("the sale could not be persisted")]
    WriteAborted,

    #[error("invalid state: {0}")]
    InvalidState(Cow<'static, str>),
}

/// Caller-facing classification of an [`Error`]
///
/// Surfaced to API clients so they can distinguish bad input from missing data
/// and aborted writes without parsing the message text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    ExecutionAborted,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::InvalidInput => "INVALID_INPUT",
            ErrorKind::ExecutionAborted => "EXECUTION_ABORTED",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnknownPaymentMethod(_) | Error::PriceModifierOutOfRange { .. } => {
                ErrorKind::InvalidInput
            }
            Error::SaleNotFound(_) | Error::NoSales | Error::EmptyRange { .. } => {
                ErrorKind::NotFound
            }
            Error::WriteAborted => ErrorKind::ExecutionAborted,
            Error::Sales(_) | Error::PaymentMethods(_) | Error::InvalidState(_) => {
                ErrorKind::Internal
            }
        }
    }
}

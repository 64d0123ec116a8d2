pub mod payment_method;
pub mod sales;

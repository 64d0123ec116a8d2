//! GraphQL backend for recording retail sales and loyalty points.
//!
//! Each sale is priced through a payment-method-specific modifier: the final
//! price is `price * price_modifier` and the earned points are
//! `price * points_modifier`. Sales can be retrieved individually, as a whole,
//! or aggregated into hourly buckets over a date range.
//!
//! The crate follows a ports-and-adapters layout: [`ports`] defines the
//! persistence gateway traits, [`adapters`] provides concrete implementations,
//! [`commands`] holds the business logic as `tower` services, and [`api`]
//! exposes everything over GraphQL.

pub mod adapters;
pub mod api;
pub mod commands;
pub mod domain;
pub mod ports;

//! GraphQL exposure for the sales service
//!
//! Builds the `async-graphql` schema and mounts it on an `axum` router with a
//! playground. Transport concerns live here; the business rules stay in
//! [`crate::commands`].

use async_graphql::http::{playground_source, GraphQLPlaygroundConfig};
use async_graphql_axum::GraphQL;
use axum::{
    response::{Html, IntoResponse},
    routing::{get, post_service},
    Router,
};

use crate::{adapters::database::memory::MemoryDatabase, commands::DomainLogic};

pub mod schema;

pub use schema::{build_schema, SalesSchema};

/// Domain logic wired to the concrete persistence adapter
pub type SalesLogic = DomainLogic<MemoryDatabase, MemoryDatabase>;

/// Axum router exposing `POST /graphql` and a GET playground
pub fn build_router(logic: SalesLogic) -> Router {
    let schema = build_schema(logic);
    Router::new()
        .route("/graphql", post_service(GraphQL::new(schema)))
        .route("/graphql/playground", get(playground))
}

async fn playground() -> impl IntoResponse {
    Html(playground_source(GraphQLPlaygroundConfig::new("/graphql")))
}

pub mod health_route;
pub mod match_route;
pub mod reindex_route;

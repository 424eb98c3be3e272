pub mod config;
pub mod proxy;
pub mod rate_limit;
pub mod routes;

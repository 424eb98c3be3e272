//! Catalog service: owns video metadata and engagement counters. All
//! read-heavy endpoints go through the cache-aside path; every direct-entity
//! write synchronously invalidates the point cache entry before responding.

pub mod cache;
pub mod config;
pub mod handlers;
pub mod models;
pub mod repo;

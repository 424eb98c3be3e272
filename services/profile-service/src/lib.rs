//! Profile service: per-account profile, watchlist, and watch history.
//! Every route requires a verified bearer credential; verification is
//! stateless and never consults the session store.

pub mod config;
pub mod handlers;
pub mod models;
pub mod notifications;
pub mod repo;

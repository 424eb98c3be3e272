//! Identity service: issues, verifies, refreshes, and revokes bearer
//! credentials, and owns the account record. The only writer of the session
//! store; every other service verifies tokens statelessly.

pub mod config;
pub mod db;
pub mod handlers;
pub mod session;

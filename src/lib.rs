// Library exports for postboard
// This allows integration tests to build the router against a test database

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod posts;
pub mod routes;
pub mod state;

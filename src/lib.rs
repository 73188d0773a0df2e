// Library exports for the CLI and integration tests

pub mod cache;
pub mod cloud_storage;
pub mod config;
pub mod crawl;
pub mod export;
pub mod models;
pub mod sentiment;
pub mod site;

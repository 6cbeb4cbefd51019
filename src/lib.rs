pub mod aws_clients;
pub mod capture;
pub mod config;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod startup;
pub mod storage;

use std::sync::Arc;

use crate::domain::{ObjectStorage, PhotoRepository};

/// AppState holds shared resources for the web server.
pub struct AppState {
    pub storage: Arc<dyn ObjectStorage>,
    pub photos: Arc<dyn PhotoRepository>,
}

//! Client connection seam.

use async_trait::async_trait;
use satchel_db::DbPool;

use crate::config::StoreConfig;

/// Seam for establishing the client pool, mockable in tests.
#[async_trait]
pub trait StoreConnector: Send + Sync {
    async fn connect(&self) -> Result<DbPool, sqlx::Error>;
}

/// Production connector: build a pool against the running store over
/// localhost. `create_pool` connects eagerly, so success here means the
/// store answered.
pub struct PgConnector {
    url: String,
}

impl PgConnector {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            url: config.connection_url(),
        }
    }
}

#[async_trait]
impl StoreConnector for PgConnector {
    async fn connect(&self) -> Result<DbPool, sqlx::Error> {
        satchel_db::create_pool(&self.url).await
    }
}

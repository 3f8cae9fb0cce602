use crate::domain::model::{Comercio, User};
use crate::utils::error::Result;
use async_trait::async_trait;

/// The `users` REST collection. One round trip per call; no retries,
/// no caching, no transport-level pagination.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list(&self) -> Result<Vec<User>>;
    async fn get(&self, id: &str) -> Result<User>;
    async fn create(&self, user: &User) -> Result<User>;
    async fn update(&self, id: &str, user: &User) -> Result<User>;
    async fn delete(&self, id: &str) -> Result<()>;
}

/// The `comercio` REST collection.
#[async_trait]
pub trait ComercioStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Comercio>>;
    async fn get(&self, id: &str) -> Result<Comercio>;
    async fn create(&self, comercio: &Comercio) -> Result<Comercio>;
    async fn update(&self, id: &str, comercio: &Comercio) -> Result<Comercio>;
    async fn delete(&self, id: &str) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn users_endpoint(&self) -> &str;
    fn comercios_endpoint(&self) -> &str;
    fn session_path(&self) -> &str;
    fn request_timeout_secs(&self) -> u64;
    fn session_ttl_hours(&self) -> i64;
}

use crate::domain::model::{Comercio, User};
use crate::domain::ports::{ComercioStore, UserStore};
use crate::utils::error::{DirectoryError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

/// Maps a non-2xx response to the error taxonomy: 404 becomes NotFound,
/// everything else UnexpectedStatus. 2xx passes through.
fn check_status(response: Response, resource: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(DirectoryError::not_found(resource));
    }
    Err(DirectoryError::UnexpectedStatus {
        status: status.as_u16(),
        url: response.url().to_string(),
    })
}

fn build_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// The `users` collection over plain REST/JSON. Stateless; every call is
/// one independent round trip.
#[derive(Debug, Clone)]
pub struct RestUserStore {
    client: Client,
    base: String,
}

impl RestUserStore {
    pub fn new(base: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base: base.into(),
        })
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/{}", self.base.trim_end_matches('/'), id)
    }
}

#[async_trait]
impl UserStore for RestUserStore {
    async fn list(&self) -> Result<Vec<User>> {
        tracing::debug!("GET {}", self.base);
        let response = self.client.get(&self.base).send().await?;
        let response = check_status(response, "User collection")?;
        Ok(response.json().await?)
    }

    async fn get(&self, id: &str) -> Result<User> {
        let url = self.item_url(id);
        tracing::debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        let response = check_status(response, "User")?;
        Ok(response.json().await?)
    }

    async fn create(&self, user: &User) -> Result<User> {
        tracing::debug!("POST {}", self.base);
        let response = self.client.post(&self.base).json(user).send().await?;
        let response = check_status(response, "User")?;
        Ok(response.json().await?)
    }

    async fn update(&self, id: &str, user: &User) -> Result<User> {
        let url = self.item_url(id);
        tracing::debug!("PUT {}", url);
        let response = self.client.put(&url).json(user).send().await?;
        let response = check_status(response, "User")?;
        Ok(response.json().await?)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let url = self.item_url(id);
        tracing::debug!("DELETE {}", url);
        let response = self.client.delete(&url).send().await?;
        check_status(response, "User")?;
        Ok(())
    }
}

/// The `comercio` collection over plain REST/JSON.
#[derive(Debug, Clone)]
pub struct RestComercioStore {
    client: Client,
    base: String,
}

impl RestComercioStore {
    pub fn new(base: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            base: base.into(),
        })
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/{}", self.base.trim_end_matches('/'), id)
    }
}

#[async_trait]
impl ComercioStore for RestComercioStore {
    async fn list(&self) -> Result<Vec<Comercio>> {
        tracing::debug!("GET {}", self.base);
        let response = self.client.get(&self.base).send().await?;
        let response = check_status(response, "Business collection")?;
        Ok(response.json().await?)
    }

    async fn get(&self, id: &str) -> Result<Comercio> {
        let url = self.item_url(id);
        tracing::debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        let response = check_status(response, "Business")?;
        Ok(response.json().await?)
    }

    async fn create(&self, comercio: &Comercio) -> Result<Comercio> {
        tracing::debug!("POST {}", self.base);
        let response = self.client.post(&self.base).json(comercio).send().await?;
        let response = check_status(response, "Business")?;
        Ok(response.json().await?)
    }

    async fn update(&self, id: &str, comercio: &Comercio) -> Result<Comercio> {
        let url = self.item_url(id);
        tracing::debug!("PUT {}", url);
        let response = self.client.put(&url).json(comercio).send().await?;
        let response = check_status(response, "Business")?;
        Ok(response.json().await?)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let url = self.item_url(id);
        tracing::debug!("DELETE {}", url);
        let response = self.client.delete(&url).send().await?;
        check_status(response, "Business")?;
        Ok(())
    }
}

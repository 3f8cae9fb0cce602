use crate::core::session::{current_principal, SessionStore};
use crate::core::{publications, scoring};
use crate::domain::model::{Comercio, Principal};
use crate::domain::ports::ComercioStore;
use crate::utils::error::{DirectoryError, Result};
use crate::utils::validation::{validate_email, validate_non_empty_string};
use chrono::{NaiveDate, Utc};

/// Input for creating a business listing, by self-registration or an admin.
#[derive(Debug, Clone)]
pub struct NewComercio {
    pub name: String,
    pub cif: String,
    pub country: String,
    pub city: String,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub category: String,
    pub password: String,
    pub image: String,
}

impl NewComercio {
    fn into_comercio(self) -> Result<Comercio> {
        validate_non_empty_string("name", &self.name)?;
        validate_non_empty_string("city", &self.city)?;
        validate_non_empty_string("category", &self.category)?;
        validate_email("email", &self.email)?;
        validate_non_empty_string("password", &self.password)?;

        Ok(Comercio {
            id: String::new(),
            name: self.name,
            cif: self.cif,
            country: self.country,
            city: self.city,
            address: self.address,
            email: self.email,
            phone: self.phone,
            category: self.category,
            password: self.password,
            image: self.image,
            scoring: 0.0,
            nscore: 0,
            reviews: vec![],
            publications: vec![],
            version: 0,
        }
        .fresh())
    }
}

/// Write side of the directory: reviews, publications, listing lifecycle.
/// Every mutation is a versioned read-modify-write (see `put_versioned`).
pub struct BusinessService<C: ComercioStore, S: SessionStore> {
    comercios: C,
    sessions: S,
}

impl<C: ComercioStore, S: SessionStore> BusinessService<C, S> {
    pub fn new(comercios: C, sessions: S) -> Self {
        Self { comercios, sessions }
    }

    fn principal(&self) -> Result<Principal> {
        current_principal(&self.sessions, Utc::now())
    }

    /// Appends a review as the acting principal and persists the refreshed
    /// aggregate. Owners cannot review themselves; anonymous visitors
    /// cannot review at all.
    pub async fn submit_review(
        &self,
        comercio_id: &str,
        text: &str,
        score: f64,
    ) -> Result<Comercio> {
        validate_non_empty_string("review text", text)?;
        let snapshot = self.comercios.get(comercio_id).await?;
        ensure_can_review(&self.principal()?, &snapshot)?;

        let mut updated = snapshot.clone();
        scoring::push_review(&mut updated, text, score)?;
        tracing::info!(
            "review for {} -> scoring {:.2} over {} reviews",
            updated.name,
            updated.scoring,
            updated.nscore
        );
        put_versioned(&self.comercios, snapshot.version, updated).await
    }

    pub async fn add_publication(
        &self,
        comercio_id: &str,
        title: &str,
        description: &str,
        image: &str,
        date: NaiveDate,
    ) -> Result<Comercio> {
        let snapshot = self.comercios.get(comercio_id).await?;
        ensure_owner(&self.principal()?, &snapshot)?;

        let mut updated = snapshot.clone();
        publications::append(&mut updated, title, description, image, date)?;
        put_versioned(&self.comercios, snapshot.version, updated).await
    }

    pub async fn edit_publication(
        &self,
        comercio_id: &str,
        index: usize,
        title: &str,
        description: &str,
        image: &str,
    ) -> Result<Comercio> {
        let snapshot = self.comercios.get(comercio_id).await?;
        ensure_owner(&self.principal()?, &snapshot)?;

        let mut updated = snapshot.clone();
        publications::edit(&mut updated, index, title, description, image)?;
        put_versioned(&self.comercios, snapshot.version, updated).await
    }

    /// Public self-registration of a listing; no login required.
    pub async fn register_comercio(&self, new: NewComercio) -> Result<Comercio> {
        let comercio = new.into_comercio()?;
        self.comercios.create(&comercio).await
    }

    /// Admin-only creation, e.g. from the admin profile panel.
    pub async fn create_comercio(&self, new: NewComercio) -> Result<Comercio> {
        match self.principal()? {
            Principal::Admin(_) => {}
            Principal::Anonymous | Principal::User(_) | Principal::Owner(_) => {
                return Err(DirectoryError::forbidden("create a business listing"))
            }
        }
        let comercio = new.into_comercio()?;
        self.comercios.create(&comercio).await
    }

    /// Admins may delete any listing; an owner may delete its own, which
    /// also ends its session. The caller is responsible for the blocking
    /// confirmation prompt before invoking this.
    pub async fn delete_comercio(&self, comercio_id: &str) -> Result<()> {
        match self.principal()? {
            Principal::Admin(_) => {
                self.comercios.delete(comercio_id).await?;
            }
            Principal::Owner(own) if own.id == comercio_id => {
                self.comercios.delete(comercio_id).await?;
                self.sessions.clear()?;
            }
            Principal::Anonymous | Principal::User(_) | Principal::Owner(_) => {
                return Err(DirectoryError::forbidden("delete this business listing"))
            }
        }
        tracing::info!("business {} deleted", comercio_id);
        Ok(())
    }
}

/// Re-fetches the record immediately before the PUT and aborts when the
/// version stamp moved past the snapshot. The remote store enforces
/// nothing; this is client-side optimistic concurrency, narrowing the
/// lost-update window rather than eliminating it.
async fn put_versioned<C: ComercioStore>(
    store: &C,
    snapshot_version: u64,
    mut updated: Comercio,
) -> Result<Comercio> {
    let current = store.get(&updated.id).await?;
    if current.version != snapshot_version {
        return Err(DirectoryError::VersionConflict {
            resource: "Business".to_string(),
            expected: snapshot_version,
            actual: current.version,
        });
    }
    updated.version = snapshot_version + 1;
    store.update(&updated.id.clone(), &updated).await
}

fn ensure_can_review(principal: &Principal, comercio: &Comercio) -> Result<()> {
    match principal {
        Principal::Anonymous => Err(DirectoryError::forbidden("review without logging in")),
        Principal::Owner(own) if own.id == comercio.id => {
            Err(DirectoryError::forbidden("review your own business"))
        }
        Principal::User(_) | Principal::Admin(_) | Principal::Owner(_) => Ok(()),
    }
}

fn ensure_owner(principal: &Principal, comercio: &Comercio) -> Result<()> {
    match principal {
        Principal::Owner(own) if own.id == comercio.id => Ok(()),
        Principal::Anonymous | Principal::User(_) | Principal::Admin(_) | Principal::Owner(_) => {
            Err(DirectoryError::forbidden(
                "manage publications of a business you do not own",
            ))
        }
    }
}

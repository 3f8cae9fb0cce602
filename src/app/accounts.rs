use crate::core::session::{current_principal, Session, SessionStore};
use crate::domain::model::{Principal, Role, User};
use crate::domain::ports::{ComercioStore, UserStore};
use crate::utils::error::{DirectoryError, Result};
use crate::utils::validation::{validate_email, validate_non_empty_string};
use chrono::{Duration, Utc};

/// Registration input for an end user. The role is always `user`; admins
/// exist only as records seeded directly in the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub user_name: String,
    pub email: String,
    pub password: String,
    pub city: String,
    pub age: u32,
}

/// Profile edit; `None` fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub city: Option<String>,
    pub age: Option<u32>,
}

/// Login, registration and profile flows for both account kinds.
pub struct AccountService<U: UserStore, C: ComercioStore, S: SessionStore> {
    users: U,
    comercios: C,
    sessions: S,
    ttl: Duration,
}

impl<U: UserStore, C: ComercioStore, S: SessionStore> AccountService<U, C, S> {
    pub fn new(users: U, comercios: C, sessions: S, ttl_hours: i64) -> Self {
        Self {
            users,
            comercios,
            sessions,
            ttl: Duration::hours(ttl_hours),
        }
    }

    /// Fetches the whole collection and scans for an exact email+password
    /// match; the store offers no query surface. A miss is a credential
    /// error, whether the account exists or not.
    pub async fn login_user(&self, email: &str, password: &str) -> Result<Session> {
        let users = self.users.list().await?;
        let found = users
            .into_iter()
            .find(|u| u.email == email && u.password == password)
            .ok_or(DirectoryError::InvalidCredentials)?;

        tracing::info!("user {} logged in", found.email);
        let session = Session::issue(Principal::from_user(found), self.ttl, Utc::now());
        self.sessions.save(&session)?;
        Ok(session)
    }

    /// Same linear scan over the `comercio` collection; the match becomes
    /// an Owner principal.
    pub async fn login_comercio(&self, email: &str, password: &str) -> Result<Session> {
        let comercios = self.comercios.list().await?;
        let found = comercios
            .into_iter()
            .find(|c| c.email == email && c.password == password)
            .ok_or(DirectoryError::InvalidCredentials)?;

        tracing::info!("business {} logged in", found.email);
        let session = Session::issue(Principal::Owner(found), self.ttl, Utc::now());
        self.sessions.save(&session)?;
        Ok(session)
    }

    pub fn logout(&self) -> Result<()> {
        self.sessions.clear()
    }

    pub fn current(&self) -> Result<Principal> {
        current_principal(&self.sessions, Utc::now())
    }

    pub async fn register_user(&self, new: NewUser) -> Result<User> {
        validate_non_empty_string("name", &new.name)?;
        validate_non_empty_string("user_name", &new.user_name)?;
        validate_email("email", &new.email)?;
        if new.password.len() < 6 {
            return Err(DirectoryError::validation(
                "password must be at least 6 characters",
            ));
        }
        validate_non_empty_string("city", &new.city)?;

        let user = User {
            id: String::new(),
            name: new.name,
            user_name: new.user_name,
            email: new.email,
            password: new.password,
            city: new.city,
            age: new.age,
            role: Role::User,
            version: 0,
        };
        self.users.create(&user).await
    }

    /// Versioned read-modify-write over the logged-in user record. The
    /// session snapshot carries the version read at login; if the stored
    /// record moved past it, the edit aborts with a conflict instead of
    /// silently overwriting.
    pub async fn update_profile(&self, changes: ProfileChanges) -> Result<User> {
        let snapshot = match self.current()? {
            Principal::User(user) | Principal::Admin(user) => user,
            Principal::Owner(_) => {
                return Err(DirectoryError::forbidden(
                    "edit a user profile from a business login",
                ))
            }
            Principal::Anonymous => {
                return Err(DirectoryError::forbidden("edit a profile without logging in"))
            }
        };

        let fresh = self.users.get(&snapshot.id).await?;
        if fresh.version != snapshot.version {
            return Err(DirectoryError::VersionConflict {
                resource: "Profile".to_string(),
                expected: snapshot.version,
                actual: fresh.version,
            });
        }

        let mut updated = fresh;
        if let Some(name) = changes.name {
            validate_non_empty_string("name", &name)?;
            updated.name = name;
        }
        if let Some(user_name) = changes.user_name {
            validate_non_empty_string("user_name", &user_name)?;
            updated.user_name = user_name;
        }
        if let Some(email) = changes.email {
            validate_email("email", &email)?;
            updated.email = email;
        }
        if let Some(password) = changes.password {
            if password.len() < 6 {
                return Err(DirectoryError::validation(
                    "password must be at least 6 characters",
                ));
            }
            updated.password = password;
        }
        if let Some(city) = changes.city {
            validate_non_empty_string("city", &city)?;
            updated.city = city;
        }
        if let Some(age) = changes.age {
            updated.age = age;
        }
        updated.version = snapshot.version + 1;

        let saved = self.users.update(&updated.id.clone(), &updated).await?;

        // The session caches the acting record; refresh it in place so the
        // next invocation sees the new version stamp. Expiry is untouched.
        if let Some(mut session) = self.sessions.load()? {
            session.principal = Principal::from_user(saved.clone());
            self.sessions.save(&session)?;
        }
        Ok(saved)
    }

    /// Deletes the logged-in user account and drops the session.
    pub async fn delete_account(&self) -> Result<()> {
        let user = match self.current()? {
            Principal::User(user) | Principal::Admin(user) => user,
            Principal::Owner(_) => {
                return Err(DirectoryError::forbidden(
                    "delete a user account from a business login",
                ))
            }
            Principal::Anonymous => {
                return Err(DirectoryError::forbidden(
                    "delete an account without logging in",
                ))
            }
        };

        self.users.delete(&user.id).await?;
        tracing::info!("account {} deleted", user.email);
        self.sessions.clear()
    }
}

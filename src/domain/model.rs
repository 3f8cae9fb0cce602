use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Role stored on a user record by the remote collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// A registered end user. The schema is owned by the external mock API;
/// the password travels in plaintext because that is what the store holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    #[serde(rename = "userName")]
    pub user_name: String,
    pub email: String,
    pub password: String,
    pub city: String,
    #[serde(default)]
    pub age: u32,
    #[serde(default)]
    pub role: Role,
    /// Client-maintained optimistic-concurrency stamp, bumped on every write.
    #[serde(default)]
    pub version: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub text: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    pub title: String,
    pub description: String,
    pub image: String,
    pub date: NaiveDate,
}

/// A business listing ("comercio"). `scoring` is the running mean of
/// `reviews[].score` and `nscore` its count; both are recomputed client-side
/// on every review append and round-tripped through the full-object update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comercio {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub cif: String,
    #[serde(default)]
    pub country: String,
    pub city: String,
    #[serde(default)]
    pub address: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub category: String,
    pub password: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub scoring: f64,
    #[serde(default)]
    pub nscore: u32,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub publications: Vec<Publication>,
    /// Client-maintained optimistic-concurrency stamp, bumped on every write.
    #[serde(default)]
    pub version: u64,
}

impl Comercio {
    /// A fresh listing as created by registration or by an admin: no reviews,
    /// no publications, aggregate at zero, version at zero.
    pub fn fresh(mut self) -> Self {
        self.id = String::new();
        self.scoring = 0.0;
        self.nscore = 0;
        self.reviews = Vec::new();
        self.publications = Vec::new();
        self.version = 0;
        self
    }
}

/// Who is acting. Every authorization point matches this exhaustively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Principal {
    Anonymous,
    User(User),
    Owner(Comercio),
    Admin(User),
}

impl Principal {
    /// Wraps a user record, dispatching on its stored role.
    pub fn from_user(user: User) -> Self {
        match user.role {
            Role::Admin => Self::Admin(user),
            Role::User => Self::User(user),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }

    /// The acting record's id, if any.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::User(user) | Self::Admin(user) => Some(&user.id),
            Self::Owner(comercio) => Some(&comercio.id),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Anonymous => "anonymous".to_string(),
            Self::User(user) => format!("user {}", user.email),
            Self::Owner(comercio) => format!("business {}", comercio.email),
            Self::Admin(user) => format!("admin {}", user.email),
        }
    }
}

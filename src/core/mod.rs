pub mod catalog;
pub mod publications;
pub mod scoring;
pub mod session;

pub use crate::domain::model::{Comercio, Principal, Publication, Review, Role, User};
pub use crate::domain::ports::{ComercioStore, ConfigProvider, UserStore};
pub use crate::utils::error::Result;

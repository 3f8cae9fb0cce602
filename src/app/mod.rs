// Application layer: services orchestrating the core engines over the ports.
// Control flow stays request/response; there is no background processing.

pub mod accounts;
pub mod business;
pub mod directory;

pub use accounts::{AccountService, NewUser, ProfileChanges};
pub use business::{BusinessService, NewComercio};
pub use directory::{DirectoryService, Listing};

//! Domain layer - Core business entities and logic
//!
//! Users own services; services own versions. Password hashing lives here
//! as the credential store.

pub mod password;
pub mod service;
pub mod user;

pub use password::{CredentialStore, Password};
pub use service::{ServiceListQuery, ServiceSummary, ServiceVersionRow, SortOrder};
pub use user::{SignedUpUser, User, UserProfile};

//! Credential store.
//!
//! Holds sign-in identities (email, Argon2 password hash, role). There are no
//! HTTP routes here; registration and login live in the `auth` feature.

pub mod models;
pub mod services;

pub use models::Role;
pub use services::CredentialService;

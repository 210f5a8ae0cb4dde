//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Account registration and password login
//! - `recipes` - Recipe lifecycle (cascade delete) and review attachment

pub mod auth;
pub mod recipes;

pub use auth::{AuthError, AuthService};
pub use recipes::RecipeService;

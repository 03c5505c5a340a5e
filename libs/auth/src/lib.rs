//! Session and authorization layer for the Hourbank client
//!
//! Provides the session store (login, logout, token validation, durable
//! persistence), pure permission/role predicates, the permission catalog,
//! and the framework-agnostic route guard.

pub mod guard;
pub mod models;
pub mod permissions;
pub mod session;

pub use guard::{GuardOutcome, RouteGuard, RouteRules};
pub use models::{LoginCredentials, LoginResponse, User, ValidateResponse};
pub use session::{Session, SessionStore};

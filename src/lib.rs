//! WeNet profile manager
//!
//! REST service that stores the profiles of the users of the platform:
//! - Profile documents with validation, merge and update semantics
//! - Historic versions of every profile
//! - Per-item management of norms, planned activities, relevant locations
//!   and relationships
//! - Bootstrap of the store from a seed file

pub mod utils;

pub mod config;
pub mod model;
pub mod persistence;
pub mod server;

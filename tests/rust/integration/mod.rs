//! Integration tests - the HTTP API served on an ephemeral port and driven
//! with a real HTTP client.

mod common;
mod historic_tests;
mod profile_collection_tests;
mod profiles_api_tests;
mod seed_tests;

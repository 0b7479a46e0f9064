// Security module for request authentication
//
// This module provides the HTTP Basic credential check used to gate
// write access to selected routes.

pub mod basic_auth;

pub use basic_auth::{BasicCredentials, check_credentials, require_basic_auth};

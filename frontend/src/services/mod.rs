//! Backend services.
//!
//! This module provides everything that talks to the Frame backend:
//!
//! # Services
//!
//! - [`http`] - Request wrapper, transports and error classification
//! - [`storage`] - Bearer token persistence (`localStorage`)
//! - [`auth`] - Registration, login and current user
//! - [`videos`] - Job creation, listing and deletion

pub mod auth;
pub mod http;
pub mod storage;
pub mod videos;

pub use http::*;
pub use storage::*;

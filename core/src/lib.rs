//! Core components for building and signing image urls.
//!
//! This crate provides the foundational types shared by the thurl services.
//!
//! ## Overview
//!
//! - **Context**: A container that holds the environment implementation used to load config
//! - **Error**: The error type returned by the fallible, opt-in parts of the services
//! - **Hash**: The keyed hashing primitives used to sign urls
//!
//! ## Example
//!
//! ```
//! use std::collections::HashMap;
//! use thurl_core::{Context, StaticEnv};
//! use thurl_core::hash::base64_url_hmac_sha1;
//!
//! let ctx = Context::new().with_env(StaticEnv {
//!     envs: HashMap::from([("THUMBOR_SECURITY_KEY".to_string(), "secret".to_string())]),
//! });
//!
//! let key = ctx.env_var("THUMBOR_SECURITY_KEY").unwrap();
//! let token = base64_url_hmac_sha1(key.as_bytes(), b"200x100/image.jpg");
//! assert_eq!(token.len(), 28);
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: Cryptographic hashing utilities
//! - [`utils`]: General utilities including data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod utils;

mod context;
pub use context::Context;
mod env;
pub use env::Env;
pub use env::OsEnv;
pub use env::StaticEnv;

mod error;
pub use error::{Error, ErrorKind, Result};

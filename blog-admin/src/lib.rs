//! # blog-admin
//!
//! Client side of the blog admin panel. The binary drives it from a terminal,
//! but every piece is usable on its own:
//!
//! - [`client::ApiClient`]: typed calls for every server endpoint
//! - [`storage::TokenStore`]: where the bearer token lives between runs
//! - [`session::Session`]: token lifecycle plus the [`guard::RouteGuard`]
//! - [`delete::DeletePostAction`]: confirm-then-delete flow
//! - [`filter::CategoryFilter`]: category selection with an "all" sentinel

pub mod client;
pub mod config;
pub mod delete;
pub mod filter;
pub mod guard;
pub mod session;
pub mod storage;

pub use client::{ApiClient, ClientError};
pub use guard::{GuardDecision, GuardState, RouteGuard};
pub use session::Session;
pub use storage::{FileTokenStore, MemoryTokenStore, TokenStore};

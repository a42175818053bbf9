//! Library crate for fleet-admin.
//!
//! This crate exposes the building blocks of the TUI:
//! - Record types for external vehicles (`model`)
//! - HTTP client and background worker (`api`)
//! - List controller, form, and update loop (`app`)
//! - Toast notifications (`notify`)
//! - In-memory search helpers (`search`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `fleet-admin` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod api;
pub mod app;
pub mod error;
pub mod model;
pub mod notify;
pub mod search;
pub mod ui;

pub use error::{AppError, Result};

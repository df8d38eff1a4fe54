//! Serial Link Module
//!
//! Talks to the HC-05 over its Serial Port Profile binding.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      LinkService                         │
//! │  (Worker thread - owns the link, serves LinkCommands)    │
//! └─────────────────────┬───────────────────────────────────┘
//!                       │
//!         ┌─────────────┼─────────────┐
//!         │             │             │
//!         ▼             ▼             ▼
//! ┌───────────┐  ┌────────────┐  ┌──────────┐
//! │ Discovery │  │ Connection │  │ Protocol │
//! │           │  │            │  │          │
//! │ - port by │  │ - open     │  │ - frames │
//! │   name    │  │ - read loop│  │ - drive  │
//! │           │  │ - sender   │  │   bytes  │
//! └───────────┘  └────────────┘  └──────────┘
//! ```
//!
//! ## Modules
//!
//! - [`protocol`] - Frame parsing and drive command encoding
//! - [`discovery`] - Locating the paired device's serial port
//! - [`connection`] - Opening the port, the read loop, and the command sender
//! - [`service`] - Worker that owns the link

pub mod connection;
pub mod discovery;
pub mod protocol;
pub mod service;

pub use service::{LinkHandle, LinkService};

//! # Core Application Logic
//!
//! This module contains Courier's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • execute() (effects)  │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┴───────────────────┐
//!            ▼                                       ▼
//!     ┌────────────┐                          ┌────────────┐
//!     │    TUI     │                          │  Backend   │
//!     │  Adapter   │                          │  (HTTP)    │
//!     │ (ratatui)  │                          │            │
//!     └────────────┘                          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and `update()`
//! - [`effect`]: Runs the network work `update()` asks for
//! - [`session`]: The signed-in user and token, persisted across runs
//! - [`storage`]: Key/value persistence behind the session
//! - [`auth`]: Credential checks done before any request
//! - [`chats`]: Search filter, time labels, mine/theirs
//! - [`config`]: Settings file, env vars, CLI overrides

pub mod action;
pub mod auth;
pub mod chats;
pub mod config;
pub mod effect;
pub mod session;
pub mod state;
pub mod storage;

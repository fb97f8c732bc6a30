//! # Core Application Logic
//!
//! The conversation lifecycle. It knows nothing about any specific UI.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Session (state)      │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • Controller (I/O)     │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │  One-shot  │      │  render()  │
//!     │ (ratatui)  │      │   (stdout) │      │ (sections) │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: `Session` and `ExchangeEntry`
//! - [`action`]: `Action`, `Effect` and the `update()` reducer
//! - [`controller`]: runs requests for `Effect::SpawnRequest`
//! - [`config`]: layered settings
//! - [`theme`]: persisted light/dark preference

pub mod action;
pub mod config;
pub mod controller;
pub mod state;
pub mod theme;

//! # Client Core
//!
//! Controller logic for the Q&A client, free of any terminal code.
//!
//! ```text
//!   key press ──► Action ──► update(&mut App) ──► Effect
//!                   ▲                               │
//!                   │                               ▼
//!                   └──── Action ◄── perform() ◄── QaBackend (HTTP)
//! ```
//!
//! The TUI adapter owns the loop: it turns input into actions, spawns
//! `perform()` for each effect and feeds the results back in.
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all controller state in one place
//! - [`action`]: The `Action` enum, `Effect` enum and `update()`
//! - [`effect`]: Runs an `Effect` against the backend
//! - [`normalize`]: Loosely-typed answer payloads → display records
//! - [`config`]: File/env/CLI settings

pub mod action;
pub mod config;
pub mod effect;
pub mod normalize;
pub mod state;

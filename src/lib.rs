//! taskflow - Task Management Library
//!
//! This library provides the core of the taskflow tool: a single-user task
//! collection engine with pluggable persistence.
//!
//! # Core Concepts
//!
//! - **Tasks and Categories**: passive records with stable integer ids
//! - **Persistence Gateway**: async CRUD traits any backend can implement
//! - **Collection Engine**: pure filter/search/sort/group derivations
//! - **Dashboard**: the single owner of canonical state, applying the
//!   confirmed-success mutation protocol and the category cascade-detach
//!
//! # Module Organization
//!
//! - `cli`: command-line interface using clap
//! - `config`: configuration loading from `.taskflow.toml`
//! - `error`: error types and result aliases
//! - `task` / `category`: entity records and their drafts/patches
//! - `gateway`: the persistence gateway contract
//! - `memory`: in-memory backend emulating the remote service
//! - `store`: JSON file store with atomic writes
//! - `view`: pure derivation functions over the canonical lists
//! - `dashboard`: the dashboard controller state machine
//! - `notice`: non-blocking user notifications
//! - `output`: shared CLI output formatting

pub mod category;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod gateway;
pub mod memory;
pub mod notice;
pub mod output;
pub mod store;
pub mod task;
pub mod view;

pub use error::{Error, Result};

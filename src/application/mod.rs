//! Use cases for accounts, sessions, and tasks.
//!
//! Each handler takes its ports as trait objects and exposes one async
//! `handle` method per command or query.

pub mod handlers;

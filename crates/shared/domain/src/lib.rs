//! # Domain Models
//!
//! Plain data shared by the packhub crates: the resolved per-name webpack
//! [`config::Configuration`], the host application config, and the well-known
//! setting names and defaults. No I/O lives here.

pub mod config;
pub mod constants;

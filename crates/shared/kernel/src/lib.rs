//! Kernel utilities shared across slices.
//! Keep this crate lightweight; it owns settings access and turns raw `webpack.*`
//! settings into resolved [`domain::config::Configuration`] values.
//!
//! ## Resolving a configuration
//! ```rust
//! use packhub_kernel::resolve::resolve_configuration;
//! use packhub_kernel::settings::FlatSettings;
//!
//! let settings = FlatSettings::new()
//!     .with("webpack.debug", true)
//!     .with("webpack.other.stats_file", "other-stats.json");
//!
//! let other = resolve_configuration(&settings, "other", "myapp").unwrap();
//! assert!(other.debug);
//! assert_eq!(other.stats_file, "other-stats.json");
//! ```
//!
//! ## Config loading
//! ```rust,no_run
//! use packhub_kernel::config::load_settings;
//!
//! let settings = load_settings(Some("config/server.toml")).unwrap();
//! ```
pub mod config;
pub mod resolve;
pub mod settings;

pub use packhub_domain as domain;

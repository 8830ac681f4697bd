//! GitHub REST driver for the pulse activity checker.
//!
//! Implements [`pulse_core::ActivitySource`] against one repository's
//! `commits` and `issues` list endpoints. Each count query is a single
//! best-effort request for a single page; the count is the page length
//! after an explicit array-of-objects shape check. Failures (transport,
//! non-success status, malformed payload) surface as
//! [`pulse_core::SourceError`] and are normalized into unreachable
//! records by the checker.
//!
//! ```rust,ignore
//! use pulse_github::GithubSource;
//!
//! let source = GithubSource::new("acme", "widget")
//!     .with_token(std::env::var("GITHUB_TOKEN").ok());
//! let snapshot = pulse_core::check_activity(&source, &roster, lookback).await?;
//! ```

pub mod client;

pub use client::GithubSource;

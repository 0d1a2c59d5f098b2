//! Content catalog query engine for a media-browsing UI.
//!
//! The engine filters, sorts, searches and ranks an immutable catalog of
//! movies and series, and keeps per-session watchlist and viewing history.
//! [`api`] exposes it over HTTP for the presentation layer.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;

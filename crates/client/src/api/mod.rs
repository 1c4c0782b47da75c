//! Endpoint groups, each an `impl ApiClient` block.

mod account;
mod auth;
mod featured;
mod inquiries;
mod properties;

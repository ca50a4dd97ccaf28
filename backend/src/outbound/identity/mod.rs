//! Hosted identity provider adapters.
//!
//! This module provides a thin HTTP implementation of the
//! `IdentityProvider` port against a GoTrue-compatible auth service.

mod dto;
mod gotrue_client;

pub use gotrue_client::GoTrueIdentityProvider;

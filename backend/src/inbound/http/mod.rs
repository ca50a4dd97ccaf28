//! HTTP inbound adapter exposing REST endpoints.

pub mod ai;
pub mod auth;
pub mod enterprises;
pub mod error;
pub mod health;
pub mod launches;
mod launches_dto;
pub mod matches;
pub mod schemas;
pub mod session;
pub mod startups;
mod startups_dto;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api/v1` resource on a scope.
///
/// Health probes are not included; they are mounted at the root.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(auth::configure)
        .configure(users::configure)
        .configure(startups::configure)
        .configure(launches::configure)
        .configure(enterprises::configure)
        .configure(matches::configure)
        .configure(ai::configure);
}

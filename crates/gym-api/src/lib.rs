//! JSON REST API for the gym registry.
//!
//! Exposes an axum [`Router`] backed by a [`GymService`] over any
//! [`GymStore`]. Reads are open; writes require staff headers (see [`auth`]).
//!
//! # Mounting
//!
//! ```rust,ignore
//! let gym = GymService::new(Arc::new(store));
//! axum::serve(listener, gym_api::router(gym)).await?;
//! ```

pub mod auth;
pub mod error;
pub mod routes;
pub mod views;

use std::path::PathBuf;

use axum::{
  Router,
  routing::{get, patch, post, put},
};
use gym_core::{service::GymService, store::GymStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

pub use error::ApiError;
use routes::{coaches, members, workers};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `gym.toml` and `GYM_*`
/// environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { PathBuf::from("gym.sqlite3") }

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full API router for `gym`.
pub fn router<S>(gym: GymService<S>) -> Router
where
  S: GymStore + 'static,
{
  Router::new()
    // Members
    .route(
      "/members",
      get(members::list::<S>)
        .post(members::create::<S>)
        .delete(members::delete_all::<S>),
    )
    .route("/members/available", get(members::available::<S>))
    .route("/members/search", get(members::search::<S>))
    .route("/members/top/{lift}", get(members::top::<S>))
    .route("/members/above-total", get(members::above_total::<S>))
    .route("/members/{id}", get(members::get_one::<S>).delete(members::delete_one::<S>))
    .route("/members/{id}/name", put(members::rename::<S>))
    .route("/members/{id}/email", put(members::change_email::<S>))
    .route("/members/{id}/date-of-birth", put(members::change_date_of_birth::<S>))
    .route("/members/{id}/membership-date", put(members::change_membership_date::<S>))
    .route("/members/{id}/lifts", patch(members::update_lifts::<S>))
    .route(
      "/members/{id}/coach",
      get(members::coach::<S>)
        .put(members::assign_coach::<S>)
        .delete(members::unassign_coach::<S>),
    )
    .route("/members/{id}/role", post(members::change_role::<S>))
    // Coaches
    .route(
      "/coaches",
      get(coaches::list::<S>)
        .post(coaches::create::<S>)
        .delete(coaches::delete_all::<S>),
    )
    .route("/coaches/available", get(coaches::available::<S>))
    .route("/coaches/search", get(coaches::search::<S>))
    .route("/coaches/most-clients", get(coaches::most_clients::<S>))
    .route("/coaches/fewest-clients", get(coaches::fewest_clients::<S>))
    .route("/coaches/{id}", get(coaches::get_one::<S>).delete(coaches::delete_one::<S>))
    .route("/coaches/{id}/name", put(coaches::rename::<S>))
    .route("/coaches/{id}/email", put(coaches::change_email::<S>))
    .route("/coaches/{id}/code", put(coaches::change_code::<S>))
    .route(
      "/coaches/{id}/workout-plans",
      put(coaches::replace_plans::<S>)
        .post(coaches::add_plan::<S>)
        .delete(coaches::remove_plan::<S>),
    )
    .route(
      "/coaches/{id}/clients",
      get(coaches::clients::<S>)
        .post(coaches::add_clients::<S>)
        .put(coaches::replace_clients::<S>)
        .delete(coaches::remove_clients::<S>),
    )
    .route("/coaches/{id}/role", post(coaches::change_role::<S>))
    // Workers
    .route(
      "/workers",
      get(workers::list::<S>)
        .post(workers::create::<S>)
        .delete(workers::delete_all::<S>),
    )
    .route("/workers/search", get(workers::search::<S>))
    .route("/workers/{id}", get(workers::get_one::<S>).delete(workers::delete_one::<S>))
    .route("/workers/{id}/name", put(workers::rename::<S>))
    .route("/workers/{id}/email", put(workers::change_email::<S>))
    .route("/workers/{id}/code", put(workers::change_code::<S>))
    .route("/workers/{id}/role", post(workers::change_role::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(gym)
}

#[cfg(test)]
mod tests;

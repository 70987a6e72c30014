//! HTTP dispatch layer: resolves session tokens to users and forwards calls
//! into the core under the global network lock.

pub mod auth;
pub mod communities;
pub mod error;
pub mod middleware;
pub mod profile;
pub mod recados;
pub mod relations;
pub mod system;

use axum::{
    Router, middleware as mw,
    routing::{delete, get, post, put},
};

use crate::auth::AppState;

pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/users", post(auth::create_user))
        .route("/sessions", post(auth::open_session))
        .route("/users/{login}/attributes/{key}", get(profile::get_attribute))
        .route("/users/{login}/friends", get(relations::list_friends))
        .route("/users/{login}/fans", get(relations::list_fans))
        .route("/users/{login}/idols", get(relations::list_idols))
        .route("/users/{login}/communities", get(communities::list_user_communities))
        .route("/communities/{name}", get(communities::get_community));

    let protected_routes = Router::new()
        .route("/profile/{key}", put(profile::edit_profile))
        .route("/users/me", delete(profile::remove_account))
        .route("/friends/{login}", post(relations::request_friend).get(relations::is_friend))
        .route("/idols/{login}", post(relations::add_idol).get(relations::is_fan))
        .route("/crushes", get(relations::list_crushes))
        .route("/crushes/{login}", post(relations::add_crush).get(relations::is_crush))
        .route("/enemies/{login}", post(relations::add_enemy).get(relations::is_enemy))
        .route("/recados/{login}", post(recados::send_recado))
        .route("/communities", post(communities::create_community))
        .route(
            "/communities/{name}/members",
            post(communities::join_community).delete(communities::leave_community),
        )
        .route("/communities/{name}/messages", post(communities::send_community_message))
        .route("/inbox/recados/next", post(recados::read_recado))
        .route("/inbox/messages/next", post(communities::read_community_message))
        .layer(mw::from_fn_with_state(state.clone(), middleware::require_auth));

    let system_routes = Router::new()
        .route("/system/save", post(system::save))
        .route("/system/reset", post(system::reset))
        .layer(mw::from_fn_with_state(state.clone(), middleware::require_admin));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(system_routes)
        .with_state(state)
}

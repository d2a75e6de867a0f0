//! Server library - espone i moduli principali per i test

pub mod core;
pub mod dtos;
pub mod entities;
pub mod repositories;
pub mod services;
pub mod ws;

// Re-export dei tipi principali per facilitare l'import
pub use core::{AppError, AppState, auth, config};
pub use services::root;

use axum::{
    Router, middleware,
    routing::{any, delete, get, patch, post},
};
use std::sync::Arc;

/// Crea il router principale dell'applicazione
pub fn create_router(state: Arc<AppState>) -> Router {
    use core::authentication_middleware;
    use ws::ws_handler;

    let authenticated = Router::new()
        .route("/dashboard", get(services::dashboard))
        .nest("/profiles", configure_profile_routes())
        .nest("/mentors", configure_mentor_routes())
        .nest("/availability", configure_availability_routes())
        .nest("/sessions", configure_session_routes())
        .nest("/messages", configure_message_routes())
        .nest("/connections", configure_connection_routes())
        .nest("/notifications", configure_notification_routes())
        .merge(configure_feed_routes())
        .nest("/admin", configure_admin_routes())
        .route("/ws", any(ws_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            authentication_middleware,
        ));

    Router::new()
        .route("/", get(root))
        .nest("/auth", configure_auth_routes())
        .merge(authenticated)
        .with_state(state)
}

/// Configura le routes di autenticazione (ruoli, registrazione, login, logout)
fn configure_auth_routes() -> Router<Arc<AppState>> {
    use services::*;
    Router::new()
        .route("/roles", get(list_roles))
        .route("/register", post(register_user))
        .route("/login", post(login_user))
        .route("/logout", post(logout_user))
}

fn configure_profile_routes() -> Router<Arc<AppState>> {
    use services::*;
    Router::new()
        .route("/me", get(get_my_profile).patch(update_my_profile))
        .route("/{profile_id}", get(get_public_profile))
        .route(
            "/{profile_id}/follow",
            post(follow_profile).delete(unfollow_profile),
        )
        .route("/{profile_id}/followers", get(list_followers))
        .route("/{profile_id}/following", get(list_following))
}

fn configure_mentor_routes() -> Router<Arc<AppState>> {
    use services::*;
    Router::new()
        .route("/", get(list_mentors))
        .route("/{profile_id}", get(get_mentor_detail))
        .route("/{profile_id}/availability", get(list_availability))
        .route("/{profile_id}/sessions", post(request_session))
}

fn configure_availability_routes() -> Router<Arc<AppState>> {
    use services::*;
    Router::new()
        .route("/", post(create_availability))
        .route("/{availability_id}", delete(delete_availability))
}

fn configure_session_routes() -> Router<Arc<AppState>> {
    use services::*;
    Router::new()
        .route("/", get(list_my_sessions))
        .route("/{session_id}", get(get_session))
        .route(
            "/{session_id}/status/{new_status}",
            post(update_session_status),
        )
        .route("/{session_id}/review", post(leave_review))
}

fn configure_message_routes() -> Router<Arc<AppState>> {
    use services::*;
    Router::new()
        .route(
            "/conversations/{profile_id}",
            get(get_conversation).post(send_message),
        )
        .route("/inbox", get(list_inbox))
        .route("/sent", get(list_sent))
        .route("/unread-count", get(unread_messages_count))
        .route("/{message_id}/read", patch(mark_message_read))
}

fn configure_connection_routes() -> Router<Arc<AppState>> {
    use services::*;
    Router::new()
        .route("/", get(list_connections))
        .route("/pending", get(list_pending_connections))
        .route(
            "/{id}",
            post(request_connection).delete(delete_connection),
        )
        .route("/{id}/{action}", post(respond_to_connection))
}

fn configure_notification_routes() -> Router<Arc<AppState>> {
    use services::*;
    Router::new()
        .route("/", get(list_notifications))
        .route("/unread-count", get(unread_notifications_count))
        .route("/read-all", post(mark_all_notifications_read))
        .route("/{notification_id}/read", patch(mark_notification_read))
}

/// Feed, post, like e commenti
fn configure_feed_routes() -> Router<Arc<AppState>> {
    use services::*;
    Router::new()
        .route("/feed", get(get_feed))
        .route("/posts", post(create_post))
        .route("/posts/{post_id}", get(get_post).delete(delete_post))
        .route("/posts/{post_id}/like", post(like_post).delete(unlike_post))
        .route(
            "/posts/{post_id}/comments",
            get(list_comments).post(create_comment),
        )
        .route("/comments/{comment_id}", delete(delete_comment))
}

/// Liste riservate allo staff; l'autenticazione è applicata dal router esterno
fn configure_admin_routes() -> Router<Arc<AppState>> {
    use core::staff_middleware;
    use services::*;
    Router::new()
        .route("/profiles", get(admin_list_profiles))
        .route("/sessions", get(admin_list_sessions))
        .route("/reviews", get(admin_list_reviews))
        .route("/messages", get(admin_list_messages))
        .layer(middleware::from_fn(staff_middleware))
}

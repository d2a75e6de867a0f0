//! Services module - Coordinatore per tutti i service handler HTTP
//!
//! Questo modulo organizza i service handlers in sotto-moduli separati per una migliore manutenibilità.
//! Ogni modulo gestisce gli endpoint HTTP per una specifica funzionalità.

pub mod admin;
pub mod auth;
pub mod connection;
pub mod feed;
pub mod follow;
pub mod mentor;
pub mod message;
pub mod notification;
pub mod profile;
pub mod review;
pub mod session;

// Re-exports per facilitare l'import
pub use admin::{admin_list_messages, admin_list_profiles, admin_list_reviews, admin_list_sessions};
pub use auth::{list_roles, login_user, logout_user, register_user};
pub use connection::{
    delete_connection, list_connections, list_pending_connections, request_connection,
    respond_to_connection,
};
pub use feed::{
    create_comment, create_post, delete_comment, delete_post, get_feed, get_post, like_post,
    list_comments, unlike_post,
};
pub use follow::{follow_profile, list_followers, list_following, unfollow_profile};
pub use mentor::{
    create_availability, delete_availability, get_mentor_detail, list_availability, list_mentors,
};
pub use message::{
    get_conversation, list_inbox, list_sent, mark_message_read, send_message,
    unread_messages_count,
};
pub use notification::{
    list_notifications, mark_all_notifications_read, mark_notification_read, notify,
    unread_notifications_count,
};
pub use profile::{dashboard, get_my_profile, get_public_profile, update_my_profile};
pub use review::leave_review;
pub use session::{get_session, list_my_sessions, request_session, update_session_status};

use axum::{http::StatusCode, response::IntoResponse};

/// Root endpoint - health check
pub async fn root() -> impl IntoResponse {
    (StatusCode::OK, "Server is running!")
}

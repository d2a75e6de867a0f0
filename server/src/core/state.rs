//! Application State - Stato globale dell'applicazione
//!
//! Contiene tutti i repository, configurazioni e stato condiviso
//! necessario per gestire l'applicazione.

use crate::repositories::{
    AvailabilityRepository, ConnectionRepository, FollowRepository, MessageRepository,
    NotificationRepository, PostRepository, ProfileRepository, ReviewRepository,
    SessionRepository, UserRepository,
};
use crate::ws::usermap::UserMap;
use sqlx::SqlitePool;

/// Stato globale dell'applicazione condiviso tra tutte le route e middleware
pub struct AppState {
    pub user: UserRepository,
    pub profile: ProfileRepository,
    pub session: SessionRepository,
    pub review: ReviewRepository,
    pub msg: MessageRepository,
    pub availability: AvailabilityRepository,
    pub connection: ConnectionRepository,
    pub follow: FollowRepository,
    pub post: PostRepository,
    pub notification: NotificationRepository,

    /// Secret key per JWT token
    pub jwt_secret: String,

    /// Mappa concorrente dei profili online con i loro canali WebSocket
    /// Key: profile_id, Value: Sender verso il task di scrittura del WebSocket
    pub users_online: UserMap,
}

impl AppState {
    /// Crea una nuova istanza di AppState inizializzando tutti i repository
    /// con il pool di connessioni fornito e la JWT secret.
    ///
    /// # Arguments
    /// * `pool` - Pool di connessioni SQLite condiviso
    /// * `jwt_secret` - Chiave segreta per la firma dei token JWT
    pub fn new(pool: SqlitePool, jwt_secret: String) -> Self {
        Self {
            user: UserRepository::new(pool.clone()),
            profile: ProfileRepository::new(pool.clone()),
            session: SessionRepository::new(pool.clone()),
            review: ReviewRepository::new(pool.clone()),
            msg: MessageRepository::new(pool.clone()),
            availability: AvailabilityRepository::new(pool.clone()),
            connection: ConnectionRepository::new(pool.clone()),
            follow: FollowRepository::new(pool.clone()),
            post: PostRepository::new(pool.clone()),
            notification: NotificationRepository::new(pool),
            jwt_secret,
            users_online: UserMap::new(),
        }
    }
}

//! Repositories module - Coordinatore per tutti i repository del progetto
//!
//! Ogni repository gestisce le operazioni di database per una specifica entità.
//! Le query sono verificate a run-time (`sqlx::query_as::<_, T>` + `FromRow`), così il
//! progetto compila anche senza un database raggiungibile; lo schema vive in `migrations/`.
//!
//! Promemoria sui metodi di sqlx:
//!   .execute()        -> INSERT/UPDATE/DELETE senza righe di ritorno
//!   .fetch_optional() -> zero o una riga
//!   .fetch_one()      -> esattamente una riga (aggregati, RETURNING)
//!   .fetch_all()      -> Vec di righe

pub mod availability;
pub mod connection;
pub mod follow;
pub mod message;
pub mod notification;
pub mod post;
pub mod profile;
pub mod review;
pub mod session;
pub mod traits;
pub mod user;

// Re-esportazione dei trait per facilitare l'import
pub use traits::{Create, Delete, Read, Update};

pub use availability::AvailabilityRepository;
pub use connection::ConnectionRepository;
pub use follow::FollowRepository;
pub use message::MessageRepository;
pub use notification::NotificationRepository;
pub use post::PostRepository;
pub use profile::ProfileRepository;
pub use review::ReviewRepository;
pub use session::SessionRepository;
pub use user::UserRepository;

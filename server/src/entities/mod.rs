//! Entities module - Entità del dominio applicativo
//!
//! Questo modulo contiene tutte le entità (models) che rappresentano i dati persistiti nel database.
//! Ogni entity corrisponde a una tabella nel database; i campi `*_username` sono letti in join.

pub mod availability;
pub mod connection;
pub mod enums;
pub mod follow;
pub mod message;
pub mod notification;
pub mod post;
pub mod profile;
pub mod review;
pub mod session;
pub mod user;

// Re-exports per facilitare l'import
pub use availability::Availability;
pub use connection::Connection;
pub use enums::{ConnectionStatus, ProfileRole, SessionActor, SessionStatus, TransitionCheck};
pub use follow::Follow;
pub use message::Message;
pub use notification::Notification;
pub use post::{Comment, Post, PostWithStats};
pub use profile::{MentorSummary, Profile};
pub use review::{Review, ReviewWithSession};
pub use session::Session;
pub use user::User;

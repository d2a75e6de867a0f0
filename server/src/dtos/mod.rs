//! DTOs module - Data Transfer Objects
//!
//! Questo modulo contiene tutti i DTOs usati per la comunicazione client-server.
//! I DTOs separano la rappresentazione esterna (API) dalla rappresentazione interna (entities).

pub mod availability;
pub mod connection;
pub mod message;
pub mod notification;
pub mod post;
pub mod profile;
pub mod query;
pub mod review;
pub mod session;
pub mod user;
pub mod ws_event;

pub use availability::{AvailabilityDTO, CreateAvailabilityDTO};
pub use connection::{
    ConnectionDTO, CreateConnectionDTO, EnrichedConnectionDTO, UpdateConnectionDTO,
};
pub use message::{CountDTO, CreateMessageDTO, MessageDTO, SendMessageDTO, WsOutgoingMessageDTO};
pub use notification::{CreateNotificationDTO, NotificationDTO, ReadAllDTO};
pub use post::{CommentDTO, CreateCommentDTO, CreatePostDTO, PostDTO, PostDetailDTO};
pub use profile::{
    DashboardDTO, MentorDetailDTO, MentorSummaryDTO, ProfileDTO, ProfileSummaryDTO,
    PublicProfileDTO, RoleChoiceDTO, UpdateProfileDTO,
};
pub use query::{
    AdminFilterQuery, BeforeDateQuery, MentorSearchQuery, NotificationQuery, SessionFilterQuery,
};
pub use review::{CreateReviewDTO, ReviewDTO};
pub use session::{CreateSessionDTO, SessionDTO, SessionDetailDTO, SessionRequestDTO};
pub use user::{CreateUserDTO, LoginDTO, RegisterDTO, SignupQuery};
pub use ws_event::WsEventDTO;

//! Enumerazioni - Tipi enumerati utilizzati nelle entità

use serde::{Deserialize, Serialize};
use std::fmt;

// ********************* ENUMERAZIONI UTILI **********************//

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum ProfileRole {
    Mentor,
    Mentee,
}

impl ProfileRole {
    pub const ALL: [ProfileRole; 2] = [ProfileRole::Mentor, ProfileRole::Mentee];

    /// Valore usato su database e query string (`MENTOR`, `MENTEE`)
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileRole::Mentor => "MENTOR",
            ProfileRole::Mentee => "MENTEE",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProfileRole::Mentor => "Mentor",
            ProfileRole::Mentee => "Mentee",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        ProfileRole::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(value))
    }
}

impl fmt::Display for ProfileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum SessionStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

/// Chi partecipa alla sessione, dal punto di vista di chi fa la richiesta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionActor {
    Mentor,
    Mentee,
}

/// Esito della verifica di una transizione di stato
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionCheck {
    Allowed,
    /// transizione valida, ma non per questo partecipante
    WrongActor,
    Invalid,
}

impl SessionStatus {
    pub const ALL: [SessionStatus; 4] = [
        SessionStatus::Pending,
        SessionStatus::Confirmed,
        SessionStatus::Completed,
        SessionStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Pending => "PENDING",
            SessionStatus::Confirmed => "CONFIRMED",
            SessionStatus::Completed => "COMPLETED",
            SessionStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        SessionStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Cancelled)
    }

    /// Regole di transizione:
    /// PENDING -> CONFIRMED (mentor), PENDING -> CANCELLED (entrambi),
    /// CONFIRMED -> COMPLETED (mentor), CONFIRMED -> CANCELLED (entrambi)
    pub fn check_transition(&self, next: SessionStatus, actor: SessionActor) -> TransitionCheck {
        use SessionStatus::*;
        match (self, next) {
            (Pending, Confirmed) | (Confirmed, Completed) => {
                if actor == SessionActor::Mentor {
                    TransitionCheck::Allowed
                } else {
                    TransitionCheck::WrongActor
                }
            }
            (Pending, Cancelled) | (Confirmed, Cancelled) => TransitionCheck::Allowed,
            _ => TransitionCheck::Invalid,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum ConnectionStatus {
    Pending,
    Accepted,
    Declined,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_is_case_insensitive() {
        assert_eq!(ProfileRole::parse("mentor"), Some(ProfileRole::Mentor));
        assert_eq!(ProfileRole::parse("MENTEE"), Some(ProfileRole::Mentee));
        assert_eq!(ProfileRole::parse("admin"), None);
    }

    #[test]
    fn test_mentor_confirms_and_completes() {
        assert_eq!(
            SessionStatus::Pending.check_transition(SessionStatus::Confirmed, SessionActor::Mentor),
            TransitionCheck::Allowed
        );
        assert_eq!(
            SessionStatus::Confirmed
                .check_transition(SessionStatus::Completed, SessionActor::Mentor),
            TransitionCheck::Allowed
        );
    }

    #[test]
    fn test_mentee_cannot_confirm_or_complete() {
        assert_eq!(
            SessionStatus::Pending.check_transition(SessionStatus::Confirmed, SessionActor::Mentee),
            TransitionCheck::WrongActor
        );
        assert_eq!(
            SessionStatus::Confirmed
                .check_transition(SessionStatus::Completed, SessionActor::Mentee),
            TransitionCheck::WrongActor
        );
    }

    #[test]
    fn test_both_can_cancel_open_sessions() {
        for actor in [SessionActor::Mentor, SessionActor::Mentee] {
            assert_eq!(
                SessionStatus::Pending.check_transition(SessionStatus::Cancelled, actor),
                TransitionCheck::Allowed
            );
            assert_eq!(
                SessionStatus::Confirmed.check_transition(SessionStatus::Cancelled, actor),
                TransitionCheck::Allowed
            );
        }
    }

    #[test]
    fn test_terminal_states_are_final() {
        for from in [SessionStatus::Completed, SessionStatus::Cancelled] {
            assert!(from.is_terminal());
            for to in SessionStatus::ALL {
                assert_eq!(
                    from.check_transition(to, SessionActor::Mentor),
                    TransitionCheck::Invalid
                );
            }
        }
    }

    #[test]
    fn test_pending_is_never_a_target() {
        assert_eq!(
            SessionStatus::Confirmed.check_transition(SessionStatus::Pending, SessionActor::Mentor),
            TransitionCheck::Invalid
        );
        assert_eq!(
            SessionStatus::Pending.check_transition(SessionStatus::Completed, SessionActor::Mentor),
            TransitionCheck::Invalid
        );
    }

    #[test]
    fn test_status_serializes_uppercase() {
        let json = serde_json::to_string(&SessionStatus::Confirmed).unwrap();
        assert_eq!(json, "\"CONFIRMED\"");
        assert_eq!(SessionStatus::parse("cancelled"), Some(SessionStatus::Cancelled));
    }
}

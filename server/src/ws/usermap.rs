use dashmap::DashMap;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, instrument, warn};

use crate::dtos::WsEventDTO;

pub enum InternalSignal {
    Shutdown,
    Event(WsEventDTO),
}

/// Profili con un WebSocket aperto, indicizzati per profile_id
pub struct UserMap {
    users_online: DashMap<i64, UnboundedSender<InternalSignal>>,
}

impl Default for UserMap {
    fn default() -> Self {
        Self::new()
    }
}

impl UserMap {
    pub fn new() -> Self {
        UserMap {
            users_online: DashMap::new(),
        }
    }

    /// Registra il canale del profilo; una connessione precedente viene chiusa
    #[instrument(skip(self, tx))]
    pub fn register_online(&self, profile_id: i64, tx: UnboundedSender<InternalSignal>) {
        info!("Registering profile {} as online", profile_id);
        if let Some(previous) = self.users_online.insert(profile_id, tx) {
            debug!("Replacing previous connection");
            let _ = previous.send(InternalSignal::Shutdown);
        }
        info!("Total online users: {}", self.users_online.len());
    }

    /// Rimuove il profilo solo se il canale registrato è ancora `tx`
    #[instrument(skip(self, tx))]
    pub fn remove_from_online(&self, profile_id: &i64, tx: &UnboundedSender<InternalSignal>) {
        info!("Removing profile from online");
        self.users_online
            .remove_if(profile_id, |_, current| current.same_channel(tx));
    }

    #[instrument(skip(self, message))]
    pub fn send_server_message_if_online(&self, profile_id: &i64, message: InternalSignal) {
        let message_type = match &message {
            InternalSignal::Shutdown => "Shutdown",
            InternalSignal::Event(WsEventDTO::Message(_)) => "Message",
            InternalSignal::Event(WsEventDTO::Notification(_)) => "Notification",
            InternalSignal::Event(WsEventDTO::Error { .. }) => "Error",
        };

        if let Some(entry) = self.users_online.get(profile_id) {
            if let Err(e) = entry.value().send(message) {
                warn!("Failed to send {} event to profile: {:?}", message_type, e);
            } else {
                debug!("{} event sent to online profile", message_type);
            }
        } else {
            debug!("Profile {} not online, {} event not sent", profile_id, message_type);
        }
    }

    pub fn online_count(&self) -> usize {
        self.users_online.len()
    }

    pub fn is_user_online(&self, profile_id: &i64) -> bool {
        self.users_online.contains_key(profile_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtos::NotificationDTO;
    use chrono::Utc;
    use tokio::sync::mpsc::unbounded_channel;

    fn notification() -> InternalSignal {
        InternalSignal::Event(WsEventDTO::Notification(NotificationDTO {
            notification_id: 1,
            title: "New follower".to_string(),
            message: "bob started following you".to_string(),
            link: "/profiles/2".to_string(),
            is_read: false,
            created_at: Utc::now(),
        }))
    }

    #[test]
    fn test_event_reaches_online_profile() {
        let map = UserMap::new();
        let (tx, mut rx) = unbounded_channel();
        map.register_online(1, tx);

        map.send_server_message_if_online(&1, notification());
        assert!(matches!(
            rx.try_recv(),
            Ok(InternalSignal::Event(WsEventDTO::Notification(_)))
        ));

        // profilo offline: nessun errore
        map.send_server_message_if_online(&2, notification());
    }

    #[test]
    fn test_new_connection_replaces_old_one() {
        let map = UserMap::new();
        let (old_tx, mut old_rx) = unbounded_channel();
        let (new_tx, mut new_rx) = unbounded_channel();

        map.register_online(1, old_tx.clone());
        map.register_online(1, new_tx.clone());
        assert!(matches!(old_rx.try_recv(), Ok(InternalSignal::Shutdown)));
        assert_eq!(map.online_count(), 1);

        // la vecchia connessione che si chiude non deve deregistrare quella nuova
        map.remove_from_online(&1, &old_tx);
        assert!(map.is_user_online(&1));

        map.send_server_message_if_online(&1, notification());
        assert!(new_rx.try_recv().is_ok());

        map.remove_from_online(&1, &new_tx);
        assert!(!map.is_user_online(&1));
    }
}

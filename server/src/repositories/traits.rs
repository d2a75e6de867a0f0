//! Trait comuni dei repository
//!
//! Ogni repository implementa solo le operazioni che ha senso esporre per la sua entità.

/// Inserimento di una nuova entità; l'id viene assegnato dal database
pub trait Create<Entity, CreateDTO> {
    async fn create(&self, data: &CreateDTO) -> Result<Entity, sqlx::Error>;
}

/// Lettura per chiave primaria (`i64` oppure coppia `(i64, i64)` per le tabelle ponte)
///
/// Ritorna `Ok(None)` se la riga non esiste.
pub trait Read<Entity, Id> {
    async fn read(&self, id: &Id) -> Result<Option<Entity>, sqlx::Error>;
}

/// Aggiornamento parziale: solo i campi `Some(_)` del DTO vengono modificati
///
/// Ritorna `sqlx::Error::RowNotFound` se l'entità non esiste.
pub trait Update<Entity, UpdateDTO, Id> {
    async fn update(&self, id: &Id, data: &UpdateDTO) -> Result<Entity, sqlx::Error>;
}

/// Cancellazione per chiave primaria
///
/// Ritorna `true` se una riga è stata effettivamente rimossa.
pub trait Delete<Id> {
    async fn delete(&self, id: &Id) -> Result<bool, sqlx::Error>;
}

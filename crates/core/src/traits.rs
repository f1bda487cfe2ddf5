use crate::models::*;
use async_trait::async_trait;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Invalid stored record: {0}")]
    InvalidRecord(String),
}

// ---------------------------------------------------------------------------
// Bot Store Trait
// ---------------------------------------------------------------------------

/// Durable storage of bot on/off state.
///
/// Backends implement the three storage primitives. The transition
/// operations (`read_or_init_bot`, `toggle_bot`) are built on top of them and
/// take no lock of their own: a toggle racing another write to the same id
/// ends with whichever write commits last.
#[async_trait]
pub trait BotStore: Send + Sync {
    /// Pure lookup. Never writes.
    async fn get_bot(&self, id: i64) -> Result<Option<BotRecord>, StoreError>;

    /// Upsert `is_on` for `id`, stamping the current time.
    async fn set_bot_state(&self, id: i64, is_on: bool) -> Result<BotRecord, StoreError>;

    /// All records, ascending by id.
    async fn list_bots(&self) -> Result<Vec<BotRecord>, StoreError>;

    /// Return the record for `id`, creating it switched off if absent.
    ///
    /// Existing records are returned as-is without bumping `updated_at`.
    async fn read_or_init_bot(&self, id: i64) -> Result<BotRecord, StoreError> {
        match self.get_bot(id).await? {
            Some(record) => Ok(record),
            None => {
                tracing::debug!(id, "Initializing unknown bot as off");
                self.set_bot_state(id, false).await
            }
        }
    }

    /// Flip `is_on`, materializing an absent record as off first.
    async fn toggle_bot(&self, id: i64) -> Result<ToggledBot, StoreError> {
        let current = self.read_or_init_bot(id).await?;
        let record = self.set_bot_state(id, !current.is_on).await?;
        tracing::info!(id, from = current.is_on, to = record.is_on, "Bot toggled");
        Ok(ToggledBot {
            record,
            toggled_from: current.is_on,
        })
    }
}

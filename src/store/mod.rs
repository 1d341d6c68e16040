mod rest;
mod sqlite;

use async_trait::async_trait;

use crate::db::{NewRoom, Room, RoomDetails, UserId};

pub use rest::RestRoomStore;
pub use sqlite::SqliteRoomStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("backend responded {status}: {body}")]
    Backend {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected row: {0}")]
    Decode(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Where chat rooms and memberships live.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Public rooms ordered by name.
    async fn public_rooms(&self) -> StoreResult<Vec<Room>>;

    /// Rooms `user` is a member of, public or not, ordered by name.
    async fn joined_rooms(&self, user: &UserId) -> StoreResult<Vec<Room>>;

    async fn room(&self, room_id: &str) -> StoreResult<Option<RoomDetails>>;

    async fn is_member(&self, room_id: &str, user: &UserId) -> StoreResult<bool>;

    /// The returned room has no members yet.
    async fn create_room(&self, new_room: &NewRoom) -> StoreResult<Room>;

    /// Joining twice is a no-op.
    async fn join(&self, room_id: &str, user: &UserId) -> StoreResult<()>;

    /// Leaving a room you are not in is a no-op.
    async fn leave(&self, room_id: &str, user: &UserId) -> StoreResult<()>;
}

pub(crate) fn member_count(count: i64) -> StoreResult<u32> {
    u32::try_from(count).map_err(|_| StoreError::Decode(format!("member count {count}")))
}

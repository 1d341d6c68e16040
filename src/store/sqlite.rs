use async_trait::async_trait;
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use tracing::debug;
use uuid::Uuid;

use crate::{
    db::{NewRoom, Room, RoomDetails, RoomVisibility, UserId},
    include_res,
};

use super::{RoomStore, StoreResult, member_count};

const PUBLIC_ROOMS: &str = "SELECT r.id, r.name, COUNT(m.member_id)
    FROM chat_room r LEFT JOIN chat_room_member m ON m.chat_room_id = r.id
    WHERE r.is_public = TRUE
    GROUP BY r.id, r.name
    ORDER BY r.name ASC";

const JOINED_ROOMS: &str = "SELECT r.id, r.name,
        (SELECT COUNT(*) FROM chat_room_member c WHERE c.chat_room_id = r.id)
    FROM chat_room r JOIN chat_room_member m ON m.chat_room_id = r.id
    WHERE m.member_id = ?
    ORDER BY r.name ASC";

#[derive(Clone)]
pub struct SqliteRoomStore {
    db_pool: SqlitePool,
}

impl SqliteRoomStore {
    pub fn new(db_pool: SqlitePool) -> Self {
        Self { db_pool }
    }

    /// Opens the pool and makes sure the tables exist.
    pub async fn connect(url: &str) -> StoreResult<Self> {
        let db_pool = SqlitePoolOptions::new()
            .max_connections(16)
            .connect(url)
            .await?;

        let store = Self::new(db_pool);
        store.migrate().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::raw_sql(include_res!(str, "/schema.sql"))
            .execute(&self.db_pool)
            .await?;
        Ok(())
    }

    async fn rooms(&self, query: &str, user: Option<&UserId>) -> StoreResult<Vec<Room>> {
        let mut query = sqlx::query_as::<_, (String, String, i64)>(query);
        if let Some(user) = user {
            query = query.bind(user.as_str());
        }

        query
            .fetch_all(&self.db_pool)
            .await?
            .into_iter()
            .map(|(id, name, count)| {
                Ok(Room {
                    id,
                    name,
                    member_count: member_count(count)?,
                })
            })
            .collect()
    }
}

#[async_trait]
impl RoomStore for SqliteRoomStore {
    async fn public_rooms(&self) -> StoreResult<Vec<Room>> {
        self.rooms(PUBLIC_ROOMS, None).await
    }

    async fn joined_rooms(&self, user: &UserId) -> StoreResult<Vec<Room>> {
        self.rooms(JOINED_ROOMS, Some(user)).await
    }

    async fn room(&self, room_id: &str) -> StoreResult<Option<RoomDetails>> {
        let Some((id, name, is_public, count)): Option<(String, String, bool, i64)> =
            sqlx::query_as(
                "SELECT r.id, r.name, r.is_public,
                    (SELECT COUNT(*) FROM chat_room_member m WHERE m.chat_room_id = r.id)
                FROM chat_room r WHERE r.id = ?",
            )
            .bind(room_id)
            .fetch_optional(&self.db_pool)
            .await?
        else {
            return Ok(None);
        };

        Ok(Some(RoomDetails {
            room: Room {
                id,
                name,
                member_count: member_count(count)?,
            },
            visibility: RoomVisibility::from_public(is_public),
        }))
    }

    async fn is_member(&self, room_id: &str, user: &UserId) -> StoreResult<bool> {
        let found: Option<(i64,)> = sqlx::query_as(
            "SELECT 1 FROM chat_room_member WHERE chat_room_id = ? AND member_id = ?",
        )
        .bind(room_id)
        .bind(user.as_str())
        .fetch_optional(&self.db_pool)
        .await?;
        Ok(found.is_some())
    }

    async fn create_room(&self, new_room: &NewRoom) -> StoreResult<Room> {
        let id = Uuid::now_v7().to_string();
        sqlx::query("INSERT INTO chat_room (id, name, is_public) VALUES (?, ?, ?)")
            .bind(&id)
            .bind(&new_room.name)
            .bind(new_room.is_public)
            .execute(&self.db_pool)
            .await?;

        debug!(%id, "inserted chat_room");
        Ok(Room {
            id,
            name: new_room.name.clone(),
            member_count: 0,
        })
    }

    async fn join(&self, room_id: &str, user: &UserId) -> StoreResult<()> {
        sqlx::query(
            "INSERT OR IGNORE INTO chat_room_member (chat_room_id, member_id) VALUES (?, ?)",
        )
        .bind(room_id)
        .bind(user.as_str())
        .execute(&self.db_pool)
        .await?;
        Ok(())
    }

    async fn leave(&self, room_id: &str, user: &UserId) -> StoreResult<()> {
        sqlx::query("DELETE FROM chat_room_member WHERE chat_room_id = ? AND member_id = ?")
            .bind(room_id)
            .bind(user.as_str())
            .execute(&self.db_pool)
            .await?;
        Ok(())
    }
}

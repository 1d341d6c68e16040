use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::db::{NewRoom, Room, RoomDetails, RoomVisibility, UserId};

use super::{RoomStore, StoreError, StoreResult, member_count};

const ROOM_COLUMNS: &str = "id,name,is_public,chat_room_member(count)";

/// Talks to a hosted PostgREST backend that exposes the `chat_room` and
/// `chat_room_member` tables.
#[derive(Clone)]
pub struct RestRoomStore {
    http_client: Client,
    rest_url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct CountRow {
    count: i64,
}

#[derive(Deserialize)]
struct RoomRow {
    id: String,
    name: String,
    #[serde(default)]
    is_public: bool,
    #[serde(default)]
    chat_room_member: Vec<CountRow>,
}

impl RoomRow {
    fn member_count(&self) -> StoreResult<u32> {
        member_count(self.chat_room_member.first().map_or(0, |row| row.count))
    }

    fn into_room(self) -> StoreResult<Room> {
        Ok(Room {
            member_count: self.member_count()?,
            id: self.id,
            name: self.name,
        })
    }

    fn into_details(self) -> StoreResult<RoomDetails> {
        let visibility = RoomVisibility::from_public(self.is_public);
        Ok(RoomDetails {
            room: self.into_room()?,
            visibility,
        })
    }
}

#[derive(Serialize)]
struct MemberRow<'a> {
    chat_room_id: &'a str,
    member_id: &'a str,
}

impl RestRoomStore {
    pub fn new(base_url: &str, api_key: impl Into<String>) -> StoreResult<Self> {
        Ok(Self::with_client(Client::builder().build()?, base_url, api_key))
    }

    pub fn with_client(http_client: Client, base_url: &str, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            rest_url: format!("{}/rest/v1", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
        }
    }

    fn table(
        &self,
        request: fn(&Client, String) -> RequestBuilder,
        table: &str,
    ) -> RequestBuilder {
        request(&self.http_client, format!("{}/{table}", self.rest_url))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    fn get(&self, table: &str) -> RequestBuilder {
        self.table(|client, url| client.get(url), table)
    }

    async fn send(request: RequestBuilder) -> StoreResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Backend { status, body });
        }

        Ok(response)
    }

    async fn fetch_rows(request: RequestBuilder) -> StoreResult<Vec<RoomRow>> {
        let response = Self::send(request).await?;
        response
            .json()
            .await
            .map_err(|err| StoreError::Decode(err.to_string()))
    }
}

#[async_trait]
impl RoomStore for RestRoomStore {
    async fn public_rooms(&self) -> StoreResult<Vec<Room>> {
        let request = self.get("chat_room").query(&[
            ("select", ROOM_COLUMNS),
            ("is_public", "eq.true"),
            ("order", "name.asc"),
        ]);

        Self::fetch_rows(request)
            .await?
            .into_iter()
            .map(RoomRow::into_room)
            .collect()
    }

    async fn joined_rooms(&self, user: &UserId) -> StoreResult<Vec<Room>> {
        // The inner-joined `mine` embed restricts rooms to the user's memberships
        // while `chat_room_member(count)` still counts every member.
        let select = format!("{ROOM_COLUMNS},mine:chat_room_member!inner(member_id)");
        let member_filter = format!("eq.{user}");
        let request = self.get("chat_room").query(&[
            ("select", select.as_str()),
            ("mine.member_id", member_filter.as_str()),
            ("order", "name.asc"),
        ]);

        Self::fetch_rows(request)
            .await?
            .into_iter()
            .map(RoomRow::into_room)
            .collect()
    }

    async fn room(&self, room_id: &str) -> StoreResult<Option<RoomDetails>> {
        let id_filter = format!("eq.{room_id}");
        let request = self.get("chat_room").query(&[
            ("select", ROOM_COLUMNS),
            ("id", id_filter.as_str()),
            ("limit", "1"),
        ]);

        Self::fetch_rows(request)
            .await?
            .into_iter()
            .next()
            .map(RoomRow::into_details)
            .transpose()
    }

    async fn is_member(&self, room_id: &str, user: &UserId) -> StoreResult<bool> {
        let room_filter = format!("eq.{room_id}");
        let member_filter = format!("eq.{user}");
        let request = self.get("chat_room_member").query(&[
            ("select", "member_id"),
            ("chat_room_id", room_filter.as_str()),
            ("member_id", member_filter.as_str()),
            ("limit", "1"),
        ]);

        let rows: Vec<serde_json::Value> = Self::send(request)
            .await?
            .json()
            .await
            .map_err(|err| StoreError::Decode(err.to_string()))?;
        Ok(!rows.is_empty())
    }

    async fn create_room(&self, new_room: &NewRoom) -> StoreResult<Room> {
        let request = self
            .table(|client, url| client.post(url), "chat_room")
            .query(&[("select", "id,name")])
            .header("Prefer", "return=representation")
            .json(&serde_json::json!({
                "name": new_room.name,
                "is_public": new_room.is_public,
            }));

        let room = Self::fetch_rows(request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Decode("insert returned no row".to_owned()))?
            .into_room()?;

        debug!(id = %room.id, "inserted chat_room");
        Ok(room)
    }

    async fn join(&self, room_id: &str, user: &UserId) -> StoreResult<()> {
        let request = self
            .table(|client, url| client.post(url), "chat_room_member")
            .header("Prefer", "resolution=ignore-duplicates,return=minimal")
            .json(&MemberRow {
                chat_room_id: room_id,
                member_id: user.as_str(),
            });

        Self::send(request).await?;
        Ok(())
    }

    async fn leave(&self, room_id: &str, user: &UserId) -> StoreResult<()> {
        let room_filter = format!("eq.{room_id}");
        let member_filter = format!("eq.{user}");
        let request = self
            .table(|client, url| client.delete(url), "chat_room_member")
            .query(&[
                ("chat_room_id", room_filter.as_str()),
                ("member_id", member_filter.as_str()),
            ]);

        Self::send(request).await?;
        Ok(())
    }
}

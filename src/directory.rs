//! Room directory: the two room listings and how they combine into a page.

use std::collections::HashSet;

use tracing::warn;

use crate::{
    db::{Room, UserId},
    store::RoomStore,
};

/// What the directory page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directory {
    /// Only the "create a room" prompt. Shown whenever there are no public
    /// rooms, even if the user has joined some.
    Empty,
    Listing {
        /// Public rooms the user has not joined yet.
        public: Vec<Room>,
        /// Rendered as-is. An empty list means the section is left out.
        joined: Vec<Room>,
    },
}

/// Public rooms by name. A failed query reads as no rooms.
pub async fn public_rooms(store: &dyn RoomStore) -> Vec<Room> {
    store.public_rooms().await.unwrap_or_else(|err| {
        warn!(error = %err, "listing public rooms failed");
        Vec::new()
    })
}

/// Rooms `user` belongs to, by name. A failed query reads as no rooms.
pub async fn joined_rooms(store: &dyn RoomStore, user: &UserId) -> Vec<Room> {
    store.joined_rooms(user).await.unwrap_or_else(|err| {
        warn!(error = %err, %user, "listing joined rooms failed");
        Vec::new()
    })
}

pub fn reconcile(public: Vec<Room>, joined: Vec<Room>) -> Directory {
    if public.is_empty() {
        return Directory::Empty;
    }

    let joined_ids: HashSet<&str> = joined.iter().map(|room| room.id.as_str()).collect();
    let public = public
        .into_iter()
        .filter(|room| !joined_ids.contains(room.id.as_str()))
        .collect();

    Directory::Listing { public, joined }
}

/// Fetches both listings side by side and reconciles them. Anonymous
/// visitors have no joined rooms.
pub async fn load(store: &dyn RoomStore, user: Option<&UserId>) -> Directory {
    let (public, joined) = tokio::join!(public_rooms(store), async {
        match user {
            Some(user) => joined_rooms(store, user).await,
            None => Vec::new(),
        }
    });

    reconcile(public, joined)
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use super::*;
    use crate::store::{MockRoomStore, StoreError};

    fn room(id: &str, name: &str, member_count: u32) -> Room {
        Room {
            id: id.to_owned(),
            name: name.to_owned(),
            member_count,
        }
    }

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[test]
    fn unjoined_public_room_is_listed_without_joined_section() {
        let alpha = room("1", "Alpha", 3);
        assert_eq!(
            reconcile(vec![alpha.clone()], vec![]),
            Directory::Listing { public: vec![alpha], joined: vec![] }
        );
    }

    #[test]
    fn joined_public_room_moves_to_joined_section() {
        let alpha = room("1", "Alpha", 3);
        assert_eq!(
            reconcile(vec![alpha.clone()], vec![alpha.clone()]),
            Directory::Listing { public: vec![], joined: vec![alpha] }
        );
    }

    #[test]
    fn no_public_rooms_shows_only_the_prompt() {
        assert_eq!(reconcile(vec![], vec![]), Directory::Empty);
        assert_eq!(reconcile(vec![], vec![room("9", "Secret", 1)]), Directory::Empty);
    }

    #[test]
    fn public_section_is_the_set_difference_by_id() {
        let public = vec![
            room("1", "Alpha", 3),
            room("2", "Bravo", 0),
            room("3", "Charlie", 8),
            room("4", "Delta", 1),
        ];
        // Same id with a stale snapshot still counts as joined.
        let joined = vec![
            room("3", "Charlie (old)", 7),
            room("1", "Alpha", 3),
            room("9", "Secret", 2),
        ];

        let Directory::Listing { public: shown, joined: listed } = reconcile(public, joined.clone())
        else {
            panic!("expected a listing");
        };
        let ids: Vec<_> = shown.iter().map(|room| room.id.as_str()).collect();
        assert_eq!(ids, ["2", "4"]);
        assert_eq!(listed, joined);
    }

    #[tokio::test]
    async fn failed_queries_read_as_empty() {
        let mut store = MockRoomStore::new();
        store
            .expect_public_rooms()
            .returning(|| Err(StoreError::Decode("boom".to_owned())));
        store
            .expect_joined_rooms()
            .returning(|_| Err(StoreError::Decode("boom".to_owned())));

        assert!(public_rooms(&store).await.is_empty());
        assert!(joined_rooms(&store, &user("u1")).await.is_empty());
        assert_eq!(load(&store, Some(&user("u1"))).await, Directory::Empty);
    }

    #[tokio::test]
    async fn anonymous_visitors_skip_the_joined_query() {
        let mut store = MockRoomStore::new();
        store
            .expect_public_rooms()
            .times(1)
            .returning(|| Ok(vec![room("1", "Alpha", 3)]));
        store.expect_joined_rooms().never();

        assert_eq!(
            load(&store, None).await,
            Directory::Listing { public: vec![room("1", "Alpha", 3)], joined: vec![] }
        );
    }

    #[tokio::test]
    async fn signed_in_users_get_both_listings() {
        let mut store = MockRoomStore::new();
        store
            .expect_public_rooms()
            .times(1)
            .returning(|| Ok(vec![room("1", "Alpha", 3), room("2", "Bravo", 1)]));
        store
            .expect_joined_rooms()
            .with(eq(user("u1")))
            .times(1)
            .returning(|_| Ok(vec![room("2", "Bravo", 1)]));

        assert_eq!(
            load(&store, Some(&user("u1"))).await,
            Directory::Listing {
                public: vec![room("1", "Alpha", 3)],
                joined: vec![room("2", "Bravo", 1)],
            }
        );
    }
}

use std::sync::Arc;

use axum::{debug_handler, extract::State, response::{Html, IntoResponse, Response}};

use crate::{
    AppResult, AppState,
    db::Room,
    directory::{self, Directory},
    identity::CurrentUser,
    include_res,
    res::escape,
    store::RoomStore,
};

#[derive(Clone, Copy)]
pub(crate) enum RoomAction {
    Join,
    Leave,
}

impl RoomAction {
    fn path(self) -> &'static str {
        match self {
            RoomAction::Join => "join",
            RoomAction::Leave => "leave",
        }
    }

    fn label(self) -> &'static str {
        match self {
            RoomAction::Join => "Join",
            RoomAction::Leave => "Leave",
        }
    }

    pub(crate) fn button(self, room_id: &str) -> String {
        include_res!(str, "/pages/room_action.html")
            .replace("{id}", &escape(room_id))
            .replace("{action}", self.path())
            .replace("{label}", self.label())
    }
}

fn room_item(room: &Room, action: Option<RoomAction>) -> String {
    include_res!(str, "/pages/room_item.html")
        .replace("{action}", &action.map(|action| action.button(&room.id)).unwrap_or_default())
        .replace("{member_count}", &room.member_count.to_string())
        .replace("{id}", &escape(&room.id))
        .replace("{name}", &escape(&room.name))
}

fn room_items(rooms: &[Room], action: Option<RoomAction>) -> String {
    rooms.iter().map(|room| room_item(room, action)).collect()
}

/// Renders the directory. Join/Leave buttons only make sense for a known user.
pub fn render(directory: &Directory, signed_in: bool) -> String {
    let Directory::Listing { public, joined } = directory else {
        return include_res!(str, "/pages/empty.html").to_owned();
    };

    let public_rooms = if public.is_empty() {
        "<p>No other public rooms.</p>".to_owned()
    } else {
        format!(
            "<ul>{}</ul>",
            room_items(public, signed_in.then_some(RoomAction::Join))
        )
    };

    let joined_section = if joined.is_empty() {
        String::new()
    } else {
        include_res!(str, "/pages/joined_section.html")
            .replace("{joined_rooms}", &room_items(joined, signed_in.then_some(RoomAction::Leave)))
    };

    include_res!(str, "/pages/index.html")
        .replace("{public_rooms}", &public_rooms)
        .replace("{joined_section}", &joined_section)
}

#[debug_handler(state = AppState)]
pub async fn index(
    State(store): State<Arc<dyn RoomStore>>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Response> {
    let directory = directory::load(store.as_ref(), user.as_ref()).await;

    Ok(Html(render(&directory, user.is_some())).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(id: &str, name: &str, member_count: u32) -> Room {
        Room {
            id: id.to_owned(),
            name: name.to_owned(),
            member_count,
        }
    }

    #[test]
    fn empty_directory_is_just_the_prompt() {
        let page = render(&Directory::Empty, true);
        assert!(page.contains("No Chat Rooms"));
        assert!(page.contains("href=\"/rooms/new\""));
        assert!(!page.contains("Public Rooms"));
    }

    #[test]
    fn joined_section_is_absent_without_joined_rooms() {
        let page = render(
            &Directory::Listing { public: vec![room("1", "Alpha", 3)], joined: vec![] },
            false,
        );
        assert!(page.contains("Public Rooms"));
        assert!(page.contains(">Alpha</a>"));
        assert!(page.contains("3 members"));
        assert!(!page.contains("Your Joined Rooms"));
        assert!(!page.contains("/rooms/1/join"));
    }

    #[test]
    fn signed_in_listing_offers_join_and_leave() {
        let page = render(
            &Directory::Listing {
                public: vec![room("1", "Alpha", 3)],
                joined: vec![room("2", "Bravo", 1)],
            },
            true,
        );
        assert!(page.contains("action=\"/rooms/1/join\""));
        assert!(page.contains("Your Joined Rooms"));
        assert!(page.contains("action=\"/rooms/2/leave\""));
    }

    #[test]
    fn fully_joined_directory_says_so() {
        let page = render(
            &Directory::Listing { public: vec![], joined: vec![room("1", "Alpha", 3)] },
            true,
        );
        assert!(page.contains("No other public rooms."));
        assert!(page.contains(">Alpha</a>"));
    }

    #[test]
    fn room_names_are_escaped() {
        let page = render(
            &Directory::Listing { public: vec![room("1", "<script>", 0)], joined: vec![] },
            false,
        );
        assert!(page.contains("&lt;script&gt;"));
        assert!(!page.contains("<script>"));
    }
}

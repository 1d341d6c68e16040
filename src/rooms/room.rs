use std::sync::Arc;

use axum::{
    debug_handler,
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
};

use crate::{
    AppResult, AppState,
    db::RoomDetails,
    identity::CurrentUser,
    include_res,
    index::RoomAction,
    res::{self, escape},
    store::RoomStore,
};

pub(crate) fn room_html(
    RoomDetails { room, visibility }: &RoomDetails,
    action: Option<RoomAction>,
) -> String {
    include_res!(str, "/pages/room.html")
        .replace("{action}", &action.map(|action| action.button(&room.id)).unwrap_or_default())
        .replace("{visibility}", &visibility.to_string())
        .replace("{member_count}", &room.member_count.to_string())
        .replace("{room_name}", &escape(&room.name))
}

#[debug_handler(state = AppState)]
pub(crate) async fn room(
    State(store): State<Arc<dyn RoomStore>>,
    CurrentUser(user): CurrentUser,
    Path(room_id): Path<String>,
) -> AppResult<Response> {
    let Some(details) = store.room(&room_id).await? else {
        return res::sorry("room");
    };

    let is_member = match &user {
        Some(user) => store.is_member(&room_id, user).await?,
        None => false,
    };

    if !details.visibility.is_public() && !is_member {
        return res::sorry("room");
    }

    let action = match (&user, is_member) {
        (None, _) => None,
        (Some(_), true) => Some(RoomAction::Leave),
        (Some(_), false) => Some(RoomAction::Join),
    };

    Ok(Html(room_html(&details, action)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Room, RoomVisibility};

    #[test]
    fn room_page_shows_name_count_and_action() {
        let details = RoomDetails {
            room: Room {
                id: "r1".to_owned(),
                name: "Tea & Biscuits".to_owned(),
                member_count: 4,
            },
            visibility: RoomVisibility::Public,
        };

        let html = room_html(&details, Some(RoomAction::Join));
        assert!(html.contains("<h1>Tea &amp; Biscuits</h1>"));
        assert!(html.contains("Public room, 4 members"));
        assert!(html.contains("action=\"/rooms/r1/join\""));

        let html = room_html(&details, None);
        assert!(!html.contains("<form"));
    }
}

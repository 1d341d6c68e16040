use std::sync::Arc;

use axum::{
    Form, debug_handler,
    extract::State,
    http::{HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use tracing::info;

use crate::{
    AppResult, AppState, identity::CurrentUser, include_res, res::escape, store::RoomStore,
};

use super::form::{FormError, NewRoomForm};

pub(crate) fn new_room_html(form: &NewRoomForm, errors: &[FormError]) -> String {
    let errors = if errors.is_empty() {
        String::new()
    } else {
        let items: String = errors
            .iter()
            .map(|err| format!("<li>{}</li>", escape(&err.to_string())))
            .collect();
        format!("<ul class=\"errors\">{items}</ul>")
    };
    let checked = if form.is_public_checked() { " checked" } else { "" };

    include_res!(str, "/pages/new_room.html")
        .replace("{errors}", &errors)
        .replace("{is_public_checked}", checked)
        .replace("{name}", &escape(&form.name))
}

#[debug_handler]
pub(crate) async fn new_room_page() -> impl IntoResponse {
    Html(new_room_html(&NewRoomForm::default(), &[]))
}

#[debug_handler(state = AppState)]
pub(crate) async fn new_room(
    State(store): State<Arc<dyn RoomStore>>,
    CurrentUser(user): CurrentUser,
    Form(form): Form<NewRoomForm>,
) -> AppResult<Response> {
    // A private room starts with its creator as the only member, so somebody
    // has to be signed in.
    let new_room = match form.validate() {
        Ok(new_room) if !new_room.is_public && user.is_none() => {
            Err(vec![FormError::PrivateNeedsUser])
        }
        validated => validated,
    };
    let new_room = match new_room {
        Ok(new_room) => new_room,
        Err(errors) => {
            return Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(new_room_html(&form, &errors)),
            )
                .into_response());
        }
    };

    info!(name = %new_room.name, is_public = new_room.is_public, "creating room");
    let room = store.create_room(&new_room).await?;
    let location = HeaderValue::try_from(format!("/rooms/{}", room.id))?;

    if let Some(user) = user {
        store.join(&room.id, &user).await?;
    }

    Ok((StatusCode::SEE_OTHER, [(header::LOCATION, location)]).into_response())
}

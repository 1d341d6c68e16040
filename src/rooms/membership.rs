use std::sync::Arc;

use axum::{
    debug_handler,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use tracing::info;

use crate::{AppResult, AppState, identity::RequireUser, res, store::RoomStore};

/// Anyone may join a public room. Private rooms are invite-only and look
/// like they don't exist.
#[debug_handler(state = AppState)]
pub(crate) async fn join(
    State(store): State<Arc<dyn RoomStore>>,
    RequireUser(user): RequireUser,
    Path(room_id): Path<String>,
) -> AppResult<Response> {
    match store.room(&room_id).await? {
        Some(details) if details.visibility.is_public() => {}
        _ => return res::sorry("room"),
    }

    store.join(&room_id, &user).await?;
    info!(%room_id, %user, "joined room");

    Ok(Redirect::to("/").into_response())
}

#[debug_handler(state = AppState)]
pub(crate) async fn leave(
    State(store): State<Arc<dyn RoomStore>>,
    RequireUser(user): RequireUser,
    Path(room_id): Path<String>,
) -> AppResult<Response> {
    store.leave(&room_id, &user).await?;
    info!(%room_id, %user, "left room");

    Ok(Redirect::to("/").into_response())
}

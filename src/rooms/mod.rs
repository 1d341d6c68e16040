pub mod form;
mod membership;
mod new;
mod room;

use axum::{Router, routing::{get, post}};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/new", get(new::new_room_page).post(new::new_room))
        .route("/{room_id}", get(room::room))
        .route("/{room_id}/join", post(membership::join))
        .route("/{room_id}/leave", post(membership::leave))
}

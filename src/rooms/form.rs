use serde::Deserialize;

use crate::db::NewRoom;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Name is required.")]
    EmptyName,
    #[error("Visibility must be on or off, got {0:?}.")]
    Visibility(String),
    #[error("Sign in to create a private room.")]
    PrivateNeedsUser,
}

/// Raw new-room form input. An unchecked checkbox sends nothing at all.
#[derive(Debug, Default, Deserialize)]
pub struct NewRoomForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_public: Option<String>,
}

fn parse_visibility(value: Option<&str>) -> Result<bool, FormError> {
    match value.map(str::trim) {
        None | Some("" | "false" | "off") => Ok(false),
        Some("on" | "true") => Ok(true),
        Some(other) => Err(FormError::Visibility(other.to_owned())),
    }
}

impl NewRoomForm {
    pub fn validate(&self) -> Result<NewRoom, Vec<FormError>> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push(FormError::EmptyName);
        }

        let is_public = parse_visibility(self.is_public.as_deref()).unwrap_or_else(|err| {
            errors.push(err);
            false
        });

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewRoom {
            name: name.to_owned(),
            is_public,
        })
    }

    /// Whether the checkbox should stay ticked when the form is shown again.
    pub fn is_public_checked(&self) -> bool {
        parse_visibility(self.is_public.as_deref()).unwrap_or(false)
    }
}

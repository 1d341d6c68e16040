use std::fmt;

/// Identifier handed to us by the auth collaborator. Only ever used as a
/// filter key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    /// Returns `None` for blank ids.
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return None;
        }

        Some(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot of a room as listed in the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub member_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomVisibility {
    Private,
    Public,
}

impl RoomVisibility {
    pub fn from_public(is_public: bool) -> Self {
        if is_public {
            RoomVisibility::Public
        } else {
            RoomVisibility::Private
        }
    }

    pub fn is_public(self) -> bool {
        self == RoomVisibility::Public
    }
}

impl fmt::Display for RoomVisibility {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RoomVisibility::Private => f.write_str("Private"),
            RoomVisibility::Public => f.write_str("Public"),
        }
    }
}

/// A room together with its visibility, for the room page and membership
/// checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomDetails {
    pub room: Room,
    pub visibility: RoomVisibility,
}

/// Validated input for creating a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoom {
    pub name: String,
    pub is_public: bool,
}

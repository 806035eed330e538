use std::fmt;
use std::str::FromStr;

use strum::EnumString;

/// Role of a portal user.
///
/// Stored profiles keep the role as a free string; this is the parsed view
/// used to choose a dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Role {
    #[strum(serialize = "admin", serialize = "administrator", serialize = "administration")]
    Admin,
    #[strum(serialize = "coach", serialize = "trainer")]
    Coach,
    #[strum(serialize = "player", serialize = "players")]
    Player,
    #[strum(default)]
    Other(String),
}

impl Role {
    /// Lenient parse; unknown strings become [`Role::Other`].
    pub fn parse(s: &str) -> Self {
        // `Other` is the strum default, so from_str never fails
        Role::from_str(s.trim()).unwrap_or_else(|_| Role::Other(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "admin",
            Role::Coach => "coach",
            Role::Player => "player",
            Role::Other(s) => s,
        }
    }

    /// Path prefix of the role's dashboard.
    pub fn home_route(&self) -> &'static str {
        match self {
            Role::Admin | Role::Other(_) => "/administration",
            Role::Coach => "/coach",
            Role::Player => "/players",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Australian state and territory codes.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a string is not one of the eight state codes.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown state code '{0}' (expected one of NSW, VIC, QLD, SA, WA, TAS, NT, ACT)")]
pub struct StateCodeError(pub String);

/// Australian state or territory.
///
/// Serialized as the upper-case postal abbreviation (`"VIC"`, `"WA"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StateCode {
    Nsw,
    Vic,
    Qld,
    Sa,
    Wa,
    Tas,
    Nt,
    Act,
}

impl StateCode {
    /// Every state code, in postal-abbreviation order.
    pub const ALL: [Self; 8] = [
        Self::Nsw,
        Self::Vic,
        Self::Qld,
        Self::Sa,
        Self::Wa,
        Self::Tas,
        Self::Nt,
        Self::Act,
    ];

    /// Postal abbreviation.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Nsw => "NSW",
            Self::Vic => "VIC",
            Self::Qld => "QLD",
            Self::Sa => "SA",
            Self::Wa => "WA",
            Self::Tas => "TAS",
            Self::Nt => "NT",
            Self::Act => "ACT",
        }
    }

    /// Whether freight into this state is priced as a remote destination.
    ///
    /// Western Australia and the Northern Territory are long-haul from the
    /// east-coast linehaul network.
    #[must_use]
    pub const fn is_remote(self) -> bool {
        matches!(self, Self::Wa | Self::Nt)
    }
}

impl fmt::Display for StateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for StateCode {
    type Err = StateCodeError;

    /// Parses an upper-case postal abbreviation such as `VIC`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|state| state.code() == s)
            .ok_or_else(|| StateCodeError(s.to_string()))
    }
}

//! Logical storage locations an upload batch can be relocated into.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IntakeError;

/// Logical storage location token.
///
/// The numeric codes are stable and may arrive from callers as raw integers;
/// anything outside the known set is rejected with `IntakeError::InvalidArgument`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    /// Publicly served web area
    Web = 1,
    /// Persistent, non-public storage
    #[default]
    Storage = 2,
    /// Installation customizing area
    Customizing = 3,
}

impl Location {
    pub const ALL: [Location; 3] = [Location::Web, Location::Storage, Location::Customizing];

    pub fn code(self) -> u8 {
        self as u8
    }
}

fn from_code<T>(code: T) -> Result<Location, IntakeError>
where
    T: Copy + Display + TryInto<u8>,
{
    match code.try_into() {
        Ok(1) => Ok(Location::Web),
        Ok(2) => Ok(Location::Storage),
        Ok(3) => Ok(Location::Customizing),
        _ => Err(IntakeError::InvalidArgument(format!(
            "No filesystem found for location code \"{}\"",
            code
        ))),
    }
}

// Callers pass codes as whatever integer type they hold, bare literals included
macro_rules! location_from_code {
    ($($int:ty),*) => {
        $(
            impl TryFrom<$int> for Location {
                type Error = IntakeError;

                fn try_from(code: $int) -> Result<Self, Self::Error> {
                    from_code(code)
                }
            }
        )*
    };
}

location_from_code!(u8, u16, u32, u64, i32, i64);

impl FromStr for Location {
    type Err = IntakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "web" => Ok(Location::Web),
            "storage" => Ok(Location::Storage),
            "customizing" => Ok(Location::Customizing),
            _ => Err(IntakeError::InvalidArgument(format!(
                "No filesystem found for location \"{}\"",
                s
            ))),
        }
    }
}

impl TryFrom<&str> for Location {
    type Error = IntakeError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Location::Web => write!(f, "web"),
            Location::Storage => write!(f, "storage"),
            Location::Customizing => write!(f, "customizing"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_try_from() {
        for location in Location::ALL {
            assert_eq!(Location::try_from(location.code()).unwrap(), location);
        }
    }

    #[test]
    fn unknown_code_is_invalid_argument() {
        let err = Location::try_from(99u8).unwrap_err();
        assert!(matches!(err, IntakeError::InvalidArgument(ref msg) if msg.contains("99")));
        assert!(Location::try_from(0u8).is_err());
    }

    #[test]
    fn wider_integer_codes_are_accepted() {
        assert_eq!(Location::try_from(1i32).unwrap(), Location::Web);
        assert_eq!(Location::try_from(2u32).unwrap(), Location::Storage);
        assert_eq!(Location::try_from(3i64).unwrap(), Location::Customizing);
        assert_eq!(Location::try_from(3u16).unwrap(), Location::Customizing);
    }

    #[test]
    fn out_of_range_codes_keep_their_value_in_the_error() {
        assert_eq!(
            Location::try_from(256u32).unwrap_err(),
            IntakeError::InvalidArgument("No filesystem found for location code \"256\"".to_string())
        );
        assert_eq!(
            Location::try_from(-1i32).unwrap_err(),
            IntakeError::InvalidArgument("No filesystem found for location code \"-1\"".to_string())
        );
        assert!(Location::try_from(258u64).is_err());
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("STORAGE".parse::<Location>().unwrap(), Location::Storage);
        assert_eq!(" web ".parse::<Location>().unwrap(), Location::Web);
        assert_eq!(
            Location::try_from("Customizing").unwrap(),
            Location::Customizing
        );
        assert!("temp".parse::<Location>().is_err());
    }

    #[test]
    fn default_is_storage() {
        assert_eq!(Location::default(), Location::Storage);
        assert_eq!(Location::Storage.to_string(), "storage");
    }
}

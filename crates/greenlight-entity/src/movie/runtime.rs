//! JSON form of a movie runtime: the string `"<minutes> mins"`.
//!
//! Use with `#[serde(with = "greenlight_entity::movie::runtime")]` on an
//! `i32` field, or the `option` submodule on `Option<i32>`. Bare numbers and
//! any other unit are rejected.

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::Serializer;

/// Formats minutes as `"<n> mins"`.
pub fn format(minutes: i32) -> String {
    format!("{minutes} mins")
}

/// Parses `"<n> mins"`; exactly one space, integer minutes.
pub fn parse(raw: &str) -> Option<i32> {
    let (minutes, unit) = raw.split_once(' ')?;
    if unit != "mins" {
        return None;
    }
    minutes.parse().ok()
}

pub fn serialize<S: Serializer>(minutes: &i32, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(*minutes))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| de::Error::custom("invalid runtime format, expected \"<n> mins\""))
}

/// Same format for optional fields; `null` and absence both mean `None`.
pub mod option {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        minutes: &Option<i32>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match minutes {
            Some(minutes) => super::serialize(minutes, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<i32>, D::Error> {
        #[derive(Deserialize)]
        struct Wrapped(#[serde(with = "super")] i32);

        Ok(Option::<Wrapped>::deserialize(deserializer)?.map(|Wrapped(minutes)| minutes))
    }
}

use std::{ops::Deref, str::FromStr};

use serde::Deserialize;
use thiserror::Error;

/// A duration written as whitespace separated parts with a unit suffix, e.g.
/// `"1d 2h 3m 4s"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duration(pub std::time::Duration);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid duration")]
pub struct InvalidDuration;

impl From<Duration> for std::time::Duration {
    fn from(value: Duration) -> Self {
        value.0
    }
}

impl Deref for Duration {
    type Target = std::time::Duration;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromStr for Duration {
    type Err = InvalidDuration;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut out = std::time::Duration::ZERO;
        for part in s.split_whitespace() {
            out = out
                .checked_add(parse_part(part)?)
                .ok_or(InvalidDuration)?;
        }
        Ok(Self(out))
    }
}

fn parse_part(part: &str) -> Result<std::time::Duration, InvalidDuration> {
    let (value, factor) = [("s", 1), ("m", 60), ("h", 60 * 60), ("d", 24 * 60 * 60)]
        .into_iter()
        .find_map(|(unit, factor)| part.strip_suffix(unit).map(|value| (value, factor)))
        .ok_or(InvalidDuration)?;
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InvalidDuration);
    }
    value
        .parse::<u64>()
        .ok()
        .and_then(|value| value.checked_mul(factor))
        .map(std::time::Duration::from_secs)
        .ok_or(InvalidDuration)
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

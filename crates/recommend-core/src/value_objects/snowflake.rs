//! Snowflake ID - time-ordered 64-bit identifier used for every entity
//!
//! Layout (most significant first):
//! - 41 bits: milliseconds since [`Snowflake::EPOCH`]
//! - 10 bits: worker id
//! - 12 bits: per-millisecond sequence

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, TimeZone, Utc};

const WORKER_BITS: u32 = 10;
const SEQUENCE_BITS: u32 = 12;
const MAX_WORKER_ID: u16 = (1 << WORKER_BITS) - 1;

/// Identifier for applications, invitations, recommender profiles and students
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Snowflake(i64);

impl Snowflake {
    /// 2024-01-01 00:00:00 UTC in milliseconds
    pub const EPOCH: i64 = 1_704_067_200_000;

    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }

    /// Milliseconds since the Unix epoch at which the id was minted
    pub fn timestamp_millis(&self) -> i64 {
        (self.0 >> (WORKER_BITS + SEQUENCE_BITS)) + Self::EPOCH
    }

    pub fn worker_id(&self) -> u16 {
        ((self.0 >> SEQUENCE_BITS) & i64::from(MAX_WORKER_ID)) as u16
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp_millis()).single()
    }
}

/// Snowflake parsing and generator construction failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SnowflakeError {
    #[error("invalid snowflake format")]
    InvalidFormat,

    #[error("worker id must be at most {MAX_WORKER_ID}, got {0}")]
    InvalidWorkerId(u16),
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Snowflake {
    type Err = SnowflakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<i64>() {
            Ok(id) if id > 0 => Ok(Self(id)),
            _ => Err(SnowflakeError::InvalidFormat),
        }
    }
}

impl From<i64> for Snowflake {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<Snowflake> for i64 {
    fn from(id: Snowflake) -> Self {
        id.0
    }
}

// JSON carries ids as strings so browser clients never lose precision
impl Serialize for Snowflake {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(Self(n)),
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Lock-free id generator.
///
/// The packed `timestamp << 12 | sequence` state only ever increases, so ids
/// stay unique and ordered even when the wall clock steps backwards or a
/// millisecond's sequence space runs out (the logical clock simply runs ahead).
pub struct SnowflakeGenerator {
    worker_id: u16,
    state: AtomicI64,
}

impl SnowflakeGenerator {
    pub fn new(worker_id: u16) -> Result<Self, SnowflakeError> {
        if worker_id > MAX_WORKER_ID {
            return Err(SnowflakeError::InvalidWorkerId(worker_id));
        }
        Ok(Self {
            worker_id,
            state: AtomicI64::new(0),
        })
    }

    pub fn generate(&self) -> Snowflake {
        let mut prev = self.state.load(Ordering::Acquire);
        loop {
            let now = (Utc::now().timestamp_millis() - Snowflake::EPOCH).max(0);
            let next = if now > prev >> SEQUENCE_BITS {
                now << SEQUENCE_BITS
            } else {
                prev + 1
            };

            match self
                .state
                .compare_exchange_weak(prev, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => {
                    let millis = next >> SEQUENCE_BITS;
                    let sequence = next & ((1 << SEQUENCE_BITS) - 1);
                    return Snowflake(
                        (millis << (WORKER_BITS + SEQUENCE_BITS))
                            | (i64::from(self.worker_id) << SEQUENCE_BITS)
                            | sequence,
                    );
                }
                Err(current) => prev = current,
            }
        }
    }

    pub fn worker_id(&self) -> u16 {
        self.worker_id
    }
}

impl Default for SnowflakeGenerator {
    fn default() -> Self {
        Self {
            worker_id: 0,
            state: AtomicI64::new(0),
        }
    }
}

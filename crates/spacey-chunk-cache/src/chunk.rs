// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Chunk identity and fingerprints

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Stable identifier of a compilable chunk.
///
/// Not a path: the same chunk may live under different roots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkId(String);

impl ChunkId {
    /// Create a chunk id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChunkId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ChunkId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Comparable staleness marker, e.g. a modification time in nanoseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(u128);

impl Fingerprint {
    /// Wrap a raw fingerprint value
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Fingerprint of a modification time. Times before the epoch map to zero.
    pub fn from_system_time(time: SystemTime) -> Self {
        let nanos = time
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        Self(nanos)
    }

    /// Raw value
    pub const fn value(self) -> u128 {
        self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_fingerprint_orders_by_time() {
        let earlier = Fingerprint::from_system_time(UNIX_EPOCH + Duration::from_secs(10));
        let later = Fingerprint::from_system_time(UNIX_EPOCH + Duration::from_secs(11));
        assert!(earlier < later);
        assert_eq!(later.value(), 11_000_000_000);
    }

    #[test]
    fn test_pre_epoch_is_zero() {
        let before = UNIX_EPOCH - Duration::from_secs(1);
        assert_eq!(Fingerprint::from_system_time(before), Fingerprint::new(0));
    }
}

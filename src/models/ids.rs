//! Strongly-typed numeric keys
//!
//! Group ids and backup slot keys are small positive integers that are
//! persisted as JSON object keys ("1", "2", ...).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use crate::error::GroupsError;

/// Macro to generate positive integer key newtypes
macro_rules! define_key {
    ($name:ident, $what:literal) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(NonZeroU32);

        impl $name {
            /// The first key of a contiguous sequence
            pub const FIRST: Self = Self(NonZeroU32::MIN);

            /// Create a key from a number, rejecting zero
            pub fn new(value: u32) -> Option<Self> {
                NonZeroU32::new(value).map(Self)
            }

            /// Get the underlying number
            pub fn get(self) -> u32 {
                self.0.get()
            }

            /// The key following this one
            pub fn next(self) -> Self {
                Self(self.0.saturating_add(1))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = GroupsError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<NonZeroU32>()
                    .map(Self)
                    .map_err(|_| {
                        GroupsError::Validation(format!(
                            "{} must be a positive integer, got '{}'",
                            $what, s
                        ))
                    })
            }
        }
    };
}

define_key!(GroupId, "Group id");
define_key!(SlotKey, "Backup slot");

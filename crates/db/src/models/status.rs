//! Enums mapping to the SMALLSERIAL lookup tables.
//!
//! Each variant's discriminant matches the seed order (1-based) of the
//! corresponding table in `20260301000001_create_lookup_tables.sql`, and its
//! label matches the seeded `name`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

/// A label that names no variant of the target enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! define_lookup_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type, Serialize, Deserialize)]
        #[repr(i16)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $label)] $variant = $val ),+
        }

        impl $name {
            /// Every variant, in seed order.
            pub const ALL: &'static [Self] = &[ $( Self::$variant ),+ ];

            /// Return the database ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            pub fn from_id(id: StatusId) -> Option<Self> {
                match id {
                    $( $val => Some(Self::$variant), )+
                    _ => None,
                }
            }

            /// The seeded lookup name, e.g. `"IN_PROGRESS"`.
            pub fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => $label, )+
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $label => Ok(Self::$variant), )+
                    other => Err(UnknownVariant {
                        kind: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

define_lookup_enum! {
    /// Account role. Admins manage everything; users work their assigned tasks.
    UserRole {
        Admin = 1 => "ADMIN",
        User = 2 => "USER",
    }
}

define_lookup_enum! {
    /// Project lifecycle status.
    ProjectStatus {
        Todo = 1 => "TODO",
        InProgress = 2 => "IN_PROGRESS",
        Completed = 3 => "COMPLETED",
        OnHold = 4 => "ON_HOLD",
    }
}

define_lookup_enum! {
    /// Task lifecycle status.
    TaskStatus {
        Todo = 1 => "TODO",
        InProgress = 2 => "IN_PROGRESS",
        Completed = 3 => "COMPLETED",
        Cancelled = 4 => "CANCELLED",
    }
}

define_lookup_enum! {
    /// Task priority, lowest first.
    TaskPriority {
        Low = 1 => "LOW",
        Medium = 2 => "MEDIUM",
        High = 3 => "HIGH",
        Urgent = 4 => "URGENT",
    }
}

impl TaskPriority {
    /// Display color for the priority badge.
    pub fn color_hex(self) -> &'static str {
        match self {
            Self::Urgent => "#FF0000",
            Self::High => "#FF8C00",
            Self::Medium => "#FFD700",
            Self::Low => "#90EE90",
        }
    }

    /// HIGH and URGENT tasks surface on the dashboards.
    pub fn needs_attention(self) -> bool {
        matches!(self, Self::High | Self::Urgent)
    }
}

/// An exact-match filter, or `All` to bypass it.
///
/// Parses from the same labels the enums use, plus the `"ALL"` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter<T> {
    #[default]
    All,
    Only(T),
}

impl<T: Copy> Filter<T> {
    /// The value to bind, or `None` when the filter is bypassed.
    pub fn value(self) -> Option<T> {
        match self {
            Filter::All => None,
            Filter::Only(v) => Some(v),
        }
    }
}

impl<T> From<Option<T>> for Filter<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Filter::All, Filter::Only)
    }
}

impl<T: FromStr> FromStr for Filter<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s == "ALL" {
            Ok(Filter::All)
        } else {
            s.parse().map(Filter::Only)
        }
    }
}

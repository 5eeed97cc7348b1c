//! Utility enum representation for the status of a milestone.
use serde::{Serialize, Serializer};

/// Enum representation for the status of a milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    /// 0 - Not started yet.
    Pending,
    /// 1 - In progress.
    #[default]
    Active,
    /// 2 - Done.
    Completed,
    /// 3 - Abandoned.
    Cancelled,
    /// 4 - A dated note rather than a task.
    Informational,
}

impl Status {
    /// All statuses in code order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Active,
        Self::Completed,
        Self::Cancelled,
        Self::Informational,
    ];

    /// Statuses listed by the `[milestones]` directive.
    pub const LISTED: [Self; 3] = [Self::Pending, Self::Active, Self::Informational];

    /// Convert a stored integer code to a `Status` enum.
    /// # Errors
    /// Returns an error if the integer is not a valid status code.
    pub fn from_int(code: i64) -> anyhow::Result<Self> {
        match code {
            0 => Ok(Self::Pending),
            1 => Ok(Self::Active),
            2 => Ok(Self::Completed),
            3 => Ok(Self::Cancelled),
            4 => Ok(Self::Informational),
            _ => Err(anyhow::anyhow!("Invalid status code: {code}")),
        }
    }

    /// Convert a `Status` enum to an integer.
    #[must_use]
    pub const fn to_int(&self) -> i64 {
        match *self {
            Self::Pending => 0,
            Self::Active => 1,
            Self::Completed => 2,
            Self::Cancelled => 3,
            Self::Informational => 4,
        }
    }

    /// Human readable name.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match *self {
            Self::Pending => "Pending",
            Self::Active => "Active",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
            Self::Informational => "Informational",
        }
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.to_int())
    }
}

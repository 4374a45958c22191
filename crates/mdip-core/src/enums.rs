//! Closed value sets for severity, status, priority and role fields.
//!
//! Every enum stores and parses through its canonical display label
//! (`"In Progress"`, `"Critical"`, ...). Parsing is an exact, case-sensitive
//! match against those labels: `"high"` is not a member of [`Severity`].

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::errors::UnknownMember;

/// A closed set whose members round-trip through a fixed label.
pub trait Enumerated: Copy + Sized + 'static {
    /// Every member, in declaration order.
    const ALL: &'static [Self];
    /// Canonical labels, index-aligned with [`Enumerated::ALL`].
    const LABELS: &'static [&'static str];

    /// The canonical label stored in the database and CSV sources.
    fn label(self) -> &'static str;

    /// Exact label lookup. No trimming, no case folding.
    fn from_label(raw: &str) -> Result<Self, UnknownMember> {
        Self::ALL
            .iter()
            .copied()
            .find(|member| member.label() == raw)
            .ok_or_else(|| UnknownMember {
                value: raw.to_string(),
                allowed: Self::LABELS,
            })
    }
}

macro_rules! label_impls {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownMember;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <Self as Enumerated>::from_label(s)
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Severity of a security incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

impl Enumerated for Severity {
    const ALL: &'static [Self] = &[Self::Low, Self::Medium, Self::High, Self::Critical];
    const LABELS: &'static [&'static str] = &["Low", "Medium", "High", "Critical"];

    fn label(self) -> &'static str {
        self.as_str()
    }
}

label_impls!(Severity);

// ---------------------------------------------------------------------------
// IncidentStatus
// ---------------------------------------------------------------------------

/// Handling state of a security incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncidentStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl IncidentStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
            Self::Closed => "Closed",
        }
    }

    /// Whether the incident still needs attention.
    #[must_use]
    pub const fn is_active(self) -> bool {
        match self {
            Self::Open | Self::InProgress => true,
            Self::Resolved | Self::Closed => false,
        }
    }
}

impl Enumerated for IncidentStatus {
    const ALL: &'static [Self] = &[Self::Open, Self::InProgress, Self::Resolved, Self::Closed];
    const LABELS: &'static [&'static str] = &["Open", "In Progress", "Resolved", "Closed"];

    fn label(self) -> &'static str {
        self.as_str()
    }
}

label_impls!(IncidentStatus);

// ---------------------------------------------------------------------------
// TicketPriority
// ---------------------------------------------------------------------------

/// Priority of an IT ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TicketPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl TicketPriority {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }

    /// Service-level target in hours.
    #[must_use]
    pub const fn sla_hours(self) -> u32 {
        match self {
            Self::Critical => 4,
            Self::High => 24,
            Self::Medium => 48,
            Self::Low => 72,
        }
    }

    /// Sort weight: 0 is the most urgent.
    #[must_use]
    pub const fn weight(self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }
}

impl Enumerated for TicketPriority {
    const ALL: &'static [Self] = &[Self::Low, Self::Medium, Self::High, Self::Critical];
    const LABELS: &'static [&'static str] = &["Low", "Medium", "High", "Critical"];

    fn label(self) -> &'static str {
        self.as_str()
    }
}

label_impls!(TicketPriority);

// ---------------------------------------------------------------------------
// TicketStatus
// ---------------------------------------------------------------------------

/// Status of an IT ticket.
///
/// ```text
/// Open → In Progress → Waiting for User → Resolved → Closed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicketStatus {
    Open,
    InProgress,
    WaitingForUser,
    Resolved,
    Closed,
}

impl TicketStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::WaitingForUser => "Waiting for User",
            Self::Resolved => "Resolved",
            Self::Closed => "Closed",
        }
    }

    /// Resolved and Closed tickets count as done.
    #[must_use]
    pub const fn is_resolved(self) -> bool {
        match self {
            Self::Resolved | Self::Closed => true,
            Self::Open | Self::InProgress | Self::WaitingForUser => false,
        }
    }
}

impl Enumerated for TicketStatus {
    const ALL: &'static [Self] = &[
        Self::Open,
        Self::InProgress,
        Self::WaitingForUser,
        Self::Resolved,
        Self::Closed,
    ];
    const LABELS: &'static [&'static str] = &[
        "Open",
        "In Progress",
        "Waiting for User",
        "Resolved",
        "Closed",
    ];

    fn label(self) -> &'static str {
        self.as_str()
    }
}

label_impls!(TicketStatus);

// ---------------------------------------------------------------------------
// UserRole
// ---------------------------------------------------------------------------

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl Enumerated for UserRole {
    const ALL: &'static [Self] = &[Self::User, Self::Admin];
    const LABELS: &'static [&'static str] = &["user", "admin"];

    fn label(self) -> &'static str {
        self.as_str()
    }
}

label_impls!(UserRole);

// ---------------------------------------------------------------------------
// EntityKind
// ---------------------------------------------------------------------------

/// The four persisted record kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Incident,
    Dataset,
    Ticket,
    User,
}

impl EntityKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Incident => "incident",
            Self::Dataset => "dataset",
            Self::Ticket => "ticket",
            Self::User => "user",
        }
    }
}

impl Enumerated for EntityKind {
    const ALL: &'static [Self] = &[Self::Incident, Self::Dataset, Self::Ticket, Self::User];
    const LABELS: &'static [&'static str] = &["incident", "dataset", "ticket", "user"];

    fn label(self) -> &'static str {
        self.as_str()
    }
}

label_impls!(EntityKind);

//! The closed catalog of permission-gated actions.
//!
//! Every action is a `resource:verb` wire identifier such as `planning:write`.
//! Calling code refers to actions symbolically through [`Action`]; the policy
//! engine compares by wire identifier through [`ActionId`].
//!
//! | Group          | Actions                                                   |
//! |----------------|-----------------------------------------------------------|
//! | Administration | `admin:access`, `users:manage`, `users:ban`, `audit:read` |
//! | Modules        | `<resource>:read`, `<resource>:write`, `<resource>:delete` |

use serde::{Deserialize, Serialize};
use std::borrow::{Borrow, Cow};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// Action Identifier
// ═══════════════════════════════════════════════════════════════════════════════

/// Identifier the engine compares grants and overrides by.
///
/// Any string is a valid identifier: overrides are not validated against the
/// catalog. The reserved value [`ActionId::WILDCARD`] (`"*"`) only has meaning
/// inside a grant set, where it stands for every action. It is never yielded
/// by [`Action::iter`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(Cow<'static, str>);

impl ActionId {
    /// Grant-set sentinel meaning "all actions unconditionally".
    pub const WILDCARD: ActionId = ActionId(Cow::Borrowed("*"));

    pub fn new(id: impl Into<String>) -> Self {
        Self(Cow::Owned(id.into()))
    }

    pub const fn from_static(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.0 == "*"
    }

    /// The catalog entry with this wire identifier, if any.
    pub fn to_action(&self) -> Option<Action> {
        Action::from_wire(self.as_str())
    }
}

impl Borrow<str> for ActionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Action> for ActionId {
    fn from(action: Action) -> Self {
        Self::from_static(action.as_str())
    }
}

impl From<String> for ActionId {
    fn from(s: String) -> Self {
        Self(Cow::Owned(s))
    }
}

impl From<&str> for ActionId {
    fn from(s: &str) -> Self {
        Self(Cow::Owned(s.to_string()))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Catalog
// ═══════════════════════════════════════════════════════════════════════════════

/// Returned when a string names no catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown action: {0}")]
pub struct UnknownAction(pub String);

macro_rules! action_catalog {
    ($( $variant:ident => ($symbol:literal, $wire:literal) ),+ $(,)?) => {
        /// A catalog action, referenced symbolically.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Action {
            $( $variant, )+
        }

        impl Action {
            /// Every catalog entry, in declaration order.
            pub const ALL: &'static [Action] = &[ $( Action::$variant, )+ ];

            /// Wire identifier, e.g. `"planning:write"`.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $( Action::$variant => $wire, )+
                }
            }

            /// Symbolic name, e.g. `"PLANNING_WRITE"`.
            pub const fn symbol(&self) -> &'static str {
                match self {
                    $( Action::$variant => $symbol, )+
                }
            }

            /// Look up a catalog entry by wire identifier.
            pub fn from_wire(wire: &str) -> Option<Action> {
                match wire {
                    $( $wire => Some(Action::$variant), )+
                    _ => None,
                }
            }

            /// Look up a catalog entry by symbolic name.
            pub fn from_symbol(symbol: &str) -> Option<Action> {
                match symbol {
                    $( $symbol => Some(Action::$variant), )+
                    _ => None,
                }
            }
        }
    };
}

action_catalog! {
    // Administration
    AdminAccess => ("ADMIN_ACCESS", "admin:access"),
    UsersManage => ("USERS_MANAGE", "users:manage"),
    UsersBan => ("USERS_BAN", "users:ban"),
    AuditRead => ("AUDIT_READ", "audit:read"),

    // Modules
    PlanningRead => ("PLANNING_READ", "planning:read"),
    PlanningWrite => ("PLANNING_WRITE", "planning:write"),
    PlanningDelete => ("PLANNING_DELETE", "planning:delete"),

    JournalRead => ("JOURNAL_READ", "journal:read"),
    JournalWrite => ("JOURNAL_WRITE", "journal:write"),
    JournalDelete => ("JOURNAL_DELETE", "journal:delete"),

    DocumentsRead => ("DOCUMENTS_READ", "documents:read"),
    DocumentsWrite => ("DOCUMENTS_WRITE", "documents:write"),
    DocumentsDelete => ("DOCUMENTS_DELETE", "documents:delete"),

    RepertoireRead => ("REPERTOIRE_READ", "repertoire:read"),
    RepertoireWrite => ("REPERTOIRE_WRITE", "repertoire:write"),
    RepertoireDelete => ("REPERTOIRE_DELETE", "repertoire:delete"),

    BusRead => ("BUS_READ", "bus:read"),
    BusWrite => ("BUS_WRITE", "bus:write"),
    BusDelete => ("BUS_DELETE", "bus:delete"),

    TaxiRead => ("TAXI_READ", "taxi:read"),
    TaxiWrite => ("TAXI_WRITE", "taxi:write"),
    TaxiDelete => ("TAXI_DELETE", "taxi:delete"),

    OttoRead => ("OTTO_READ", "otto:read"),
    OttoWrite => ("OTTO_WRITE", "otto:write"),
    OttoDelete => ("OTTO_DELETE", "otto:delete"),

    PtcarRead => ("PTCAR_READ", "ptcar:read"),
    PtcarWrite => ("PTCAR_WRITE", "ptcar:write"),
    PtcarDelete => ("PTCAR_DELETE", "ptcar:delete"),

    B201Read => ("B201_READ", "b201:read"),
    B201Write => ("B201_WRITE", "b201:write"),
    B201Delete => ("B201_DELETE", "b201:delete"),

    EbpRead => ("EBP_READ", "ebp:read"),
    EbpWrite => ("EBP_WRITE", "ebp:write"),
    EbpDelete => ("EBP_DELETE", "ebp:delete"),

    OperationnelRead => ("OPERATIONNEL_READ", "ops:read"),
    OperationnelWrite => ("OPERATIONNEL_WRITE", "ops:write"),
    OperationnelDelete => ("OPERATIONNEL_DELETE", "ops:delete"),

    CartePnRead => ("CARTE_PN_READ", "carte_pn:read"),
    CartePnWrite => ("CARTE_PN_WRITE", "carte_pn:write"),
    CartePnDelete => ("CARTE_PN_DELETE", "carte_pn:delete"),

    PmrRead => ("PMR_READ", "pmr:read"),
    PmrWrite => ("PMR_WRITE", "pmr:write"),
    PmrDelete => ("PMR_DELETE", "pmr:delete"),

    DartsRead => ("DARTS_READ", "darts:read"),
    DartsWrite => ("DARTS_WRITE", "darts:write"),
    DartsDelete => ("DARTS_DELETE", "darts:delete"),
}

/// Module resources that carry `read`, `write`, and `delete` variants.
pub const MODULE_RESOURCES: &[&str] = &[
    "planning",
    "journal",
    "documents",
    "repertoire",
    "bus",
    "taxi",
    "otto",
    "ptcar",
    "b201",
    "ebp",
    "ops",
    "carte_pn",
    "pmr",
    "darts",
];

impl Action {
    /// Iterate the catalog in declaration order.
    pub fn iter() -> impl Iterator<Item = Action> {
        Self::ALL.iter().copied()
    }

    /// `(symbolic name, wire identifier)` pairs for the whole catalog.
    pub fn catalog() -> impl Iterator<Item = (&'static str, &'static str)> {
        Self::iter().map(|a| (a.symbol(), a.as_str()))
    }

    /// Resource namespace, e.g. `"planning"` for `planning:write`.
    pub fn resource(&self) -> &'static str {
        self.split().0
    }

    /// Verb, e.g. `"write"` for `planning:write`.
    pub fn verb(&self) -> &'static str {
        self.split().1
    }

    /// All catalog actions on one resource namespace.
    pub fn for_resource(resource: &str) -> impl Iterator<Item = Action> + '_ {
        Self::iter().filter(move |a| a.resource() == resource)
    }

    /// Whether this is one of the administration-only actions.
    pub fn is_administrative(&self) -> bool {
        !MODULE_RESOURCES.contains(&self.resource())
    }

    fn split(&self) -> (&'static str, &'static str) {
        let wire = self.as_str();
        // Every catalog literal contains exactly one ':'.
        wire.split_once(':').unwrap_or((wire, ""))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = UnknownAction;

    /// Accepts either the wire identifier or the symbolic name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wire(s)
            .or_else(|| Self::from_symbol(s))
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}

impl Serialize for Action {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

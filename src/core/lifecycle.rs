//! Archive/restore lifecycle.
//!
//! Every archivable entity is in exactly one of two lifecycle states, and
//! archive cascades follow a single declared policy table instead of ad hoc
//! per-endpoint queries. Restore never reverses a cascade, and permanent
//! deletion is only reachable from the `Archived` state.

use serde::{Deserialize, Serialize};

/// Lifecycle state of an archivable record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifecycle {
    /// Visible in normal listings
    Active,
    /// Soft-deleted; hidden from listings, restorable, permanently deletable
    Archived,
}

impl Lifecycle {
    /// Maps the stored `is_archived` flag to a lifecycle state.
    #[must_use]
    pub const fn from_flag(is_archived: bool) -> Self {
        if is_archived { Self::Archived } else { Self::Active }
    }
}

/// The archivable entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Patient record
    Patient,
    /// Catalog service
    Service,
    /// Invoice
    Invoice,
    /// Staff profile
    StaffProfile,
}

/// Declared cascade policy: archiving the left entity also archives the
/// listed dependents. Restores never consult this table.
pub const CASCADE_ON_ARCHIVE: &[(EntityKind, &[EntityKind])] = &[
    (EntityKind::Patient, &[EntityKind::Invoice]),
    (EntityKind::Service, &[EntityKind::Invoice]),
    (EntityKind::Invoice, &[]),
    (EntityKind::StaffProfile, &[]),
];

/// Dependent kinds archived alongside `kind`.
#[must_use]
pub fn cascade_targets(kind: EntityKind) -> &'static [EntityKind] {
    CASCADE_ON_ARCHIVE
        .iter()
        .find(|(k, _)| *k == kind)
        .map_or(&[], |(_, targets)| targets)
}

/// Whether archiving `kind` cascades to invoices.
#[must_use]
pub fn cascades_to_invoices(kind: EntityKind) -> bool {
    cascade_targets(kind).contains(&EntityKind::Invoice)
}

//! Service entity - The dental treatment catalog.
//!
//! Each service belongs to a fixed category with a default price; a service
//! created without a price inherits its category default. Archiving a service
//! cascades to every invoice that contains a line item for it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Fixed catalog of dental treatment categories.
///
/// The database stores the screaming-snake key (e.g. `"WISDOM_TOOTH"`), which
/// is also the JSON representation.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    Default,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceCategory {
    /// Dental check-up / consultation
    #[default]
    #[sea_orm(string_value = "CHECKUP")]
    Checkup,
    /// Oral prophylaxis / cleaning
    #[sea_orm(string_value = "CLEANING")]
    Cleaning,
    /// Fluoride treatment
    #[sea_orm(string_value = "FLUORIDE")]
    Fluoride,
    /// Sealants
    #[sea_orm(string_value = "SEALANTS")]
    Sealants,
    /// Tooth filling / restoration
    #[sea_orm(string_value = "FILLING")]
    Filling,
    /// Crown and bridge
    #[sea_orm(string_value = "CROWN")]
    Crown,
    /// Veneers
    #[sea_orm(string_value = "VENEERS")]
    Veneers,
    /// Root canal treatment
    #[sea_orm(string_value = "ROOTCANAL")]
    Rootcanal,
    /// Tooth extraction
    #[sea_orm(string_value = "EXTRACTION")]
    Extraction,
    /// Surgical extraction
    #[sea_orm(string_value = "SURGICAL_EXTRACTION")]
    SurgicalExtraction,
    /// Wisdom tooth removal
    #[sea_orm(string_value = "WISDOM_TOOTH")]
    WisdomTooth,
    /// Braces - metal
    #[sea_orm(string_value = "BRACES_METAL")]
    BracesMetal,
    /// Braces - ceramic
    #[sea_orm(string_value = "BRACES_CERAMIC")]
    BracesCeramic,
    /// Clear aligners / Invisalign
    #[sea_orm(string_value = "CLEAR_ALIGNERS")]
    ClearAligners,
    /// Partial dentures
    #[sea_orm(string_value = "DENTURES_PARTIAL")]
    DenturesPartial,
    /// Full dentures
    #[sea_orm(string_value = "DENTURES_FULL")]
    DenturesFull,
    /// Dental implants
    #[sea_orm(string_value = "IMPLANT")]
    Implant,
    /// Scaling and root planing
    #[sea_orm(string_value = "SCALING_ROOTPLANING")]
    ScalingRootplaning,
    /// Gum surgery
    #[sea_orm(string_value = "GUM_SURGERY")]
    GumSurgery,
    /// Teeth whitening
    #[sea_orm(string_value = "TEETH_WHITENING")]
    TeethWhitening,
    /// Smile makeover
    #[sea_orm(string_value = "SMILE_MAKEOVER")]
    SmileMakeover,
    /// Dental X-ray
    #[sea_orm(string_value = "DENTAL_XRAY")]
    DentalXray,
    /// Panoramic X-ray
    #[sea_orm(string_value = "PANORAMIC_XRAY")]
    PanoramicXray,
    /// Child check-up
    #[sea_orm(string_value = "PEDIATRIC_CHECKUP")]
    PediatricCheckup,
    /// Fluoride for kids
    #[sea_orm(string_value = "PEDIATRIC_FLUORIDE")]
    PediatricFluoride,
    /// Pulpotomy / pediatric filling
    #[sea_orm(string_value = "PULPOTOMY")]
    Pulpotomy,
    /// Medical certificate
    #[sea_orm(string_value = "MEDICAL_CERTIFICATE")]
    MedicalCertificate,
}

impl ServiceCategory {
    /// Human-readable label for catalog listings.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Checkup => "Dental Check-up / Consultation",
            Self::Cleaning => "Oral Prophylaxis / Cleaning",
            Self::Fluoride => "Fluoride Treatment",
            Self::Sealants => "Sealants",
            Self::Filling => "Tooth Filling / Restoration",
            Self::Crown => "Crown and Bridge",
            Self::Veneers => "Veneers",
            Self::Rootcanal => "Root Canal Treatment",
            Self::Extraction => "Tooth Extraction",
            Self::SurgicalExtraction => "Surgical Extraction",
            Self::WisdomTooth => "Wisdom Tooth Removal",
            Self::BracesMetal => "Braces - Metal",
            Self::BracesCeramic => "Braces - Ceramic",
            Self::ClearAligners => "Clear Aligners / Invisalign",
            Self::DenturesPartial => "Partial Dentures",
            Self::DenturesFull => "Full Dentures",
            Self::Implant => "Dental Implants",
            Self::ScalingRootplaning => "Scaling and Root Planing",
            Self::GumSurgery => "Gum Surgery",
            Self::TeethWhitening => "Teeth Whitening",
            Self::SmileMakeover => "Smile Makeover",
            Self::DentalXray => "Dental X-ray",
            Self::PanoramicXray => "Panoramic X-ray",
            Self::PediatricCheckup => "Child Check-up",
            Self::PediatricFluoride => "Fluoride for Kids",
            Self::Pulpotomy => "Pulpotomy / Pediatric Filling",
            Self::MedicalCertificate => "Medical Certificate",
        }
    }

    /// Default price applied when a service is created without one.
    #[must_use]
    pub const fn default_price(self) -> f64 {
        match self {
            Self::Checkup => 500.0,
            Self::Cleaning | Self::DentalXray => 800.0,
            Self::Fluoride => 600.0,
            Self::Sealants => 1000.0,
            Self::Filling => 1200.0,
            Self::Crown => 8000.0,
            Self::Veneers => 12000.0,
            Self::Rootcanal | Self::TeethWhitening => 5000.0,
            Self::Extraction | Self::PanoramicXray => 1500.0,
            Self::SurgicalExtraction => 3000.0,
            Self::WisdomTooth => 3500.0,
            Self::BracesMetal | Self::DenturesFull => 25000.0,
            Self::BracesCeramic => 40000.0,
            Self::ClearAligners | Self::Implant => 80000.0,
            Self::DenturesPartial | Self::SmileMakeover => 15000.0,
            Self::ScalingRootplaning | Self::Pulpotomy => 2000.0,
            Self::GumSurgery => 7000.0,
            Self::PediatricCheckup => 400.0,
            Self::PediatricFluoride => 500.0,
            Self::MedicalCertificate => 300.0,
        }
    }
}

/// Service database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "services")]
pub struct Model {
    /// Unique identifier for the service
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Treatment category
    pub category: ServiceCategory,
    /// Display name of the service
    pub name: String,
    /// Optional longer description
    pub description: String,
    /// Current price; snapshotted into line items at invoicing time
    pub price: f64,
    /// Whether the service is currently sellable
    pub active: bool,
    /// Soft delete flag - archived services are hidden from the catalog
    pub is_archived: bool,
}

/// Defines relationships between Service and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One service appears in many invoice line items
    #[sea_orm(has_many = "super::invoice_item::Entity")]
    InvoiceItems,
}

impl Related<super::invoice_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InvoiceItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

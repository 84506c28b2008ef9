//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod api_token;
pub mod invoice;
pub mod invoice_item;
pub mod patient;
pub mod service;
pub mod session;
pub mod staff_profile;
pub mod user;

// Re-export specific types to avoid conflicts
pub use api_token::{Column as ApiTokenColumn, Entity as ApiToken, Model as ApiTokenModel};
pub use invoice::{Column as InvoiceColumn, Entity as Invoice, Model as InvoiceModel};
pub use invoice_item::{
    Column as InvoiceItemColumn, Entity as InvoiceItem, Model as InvoiceItemModel,
};
pub use patient::{Column as PatientColumn, Entity as Patient, Model as PatientModel};
pub use service::{
    Column as ServiceColumn, Entity as Service, Model as ServiceModel, ServiceCategory,
};
pub use session::{Column as SessionColumn, Entity as Session, Model as SessionModel};
pub use staff_profile::{
    Column as StaffProfileColumn, Entity as StaffProfile, Model as StaffProfileModel, Position,
};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};

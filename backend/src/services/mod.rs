//! Business logic services for Stockbook

pub mod address;
pub mod auth;
pub mod grn;
pub mod invoice;
pub mod product;
pub mod reporting;

pub use address::AddressService;
pub use auth::AuthService;
pub use grn::GrnService;
pub use invoice::InvoiceService;
pub use product::ProductService;
pub use reporting::ReportingService;

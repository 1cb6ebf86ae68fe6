//! Data model shared by the job board crates
//!
//! Listing records come from the hosted listing store and are immutable for
//! the lifetime of a view. Role categories are plain denormalized tags.

pub mod catalog;
pub mod listing;

pub use catalog::{
    EmploymentType, OpenPositions, RoleCategory, TopRole, UnknownVariant, TOP_ROLES,
};
pub use listing::{ListingDetail, ListingRecord, NewListing};

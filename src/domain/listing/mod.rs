//! Listing module - from source records to canonical listings.
//!
//! Pipeline, applied once per repository reload:
//!
//! 1. [`RawListing::from_json`] resolves per-source field aliases.
//! 2. [`ingest`] gates on publication status, derives amenities and calls
//!    the price normalizer ([`normalize`]).
//! 3. The result is an immutable [`CanonicalListing`].

mod amenities;
mod canonical;
mod ingest;
mod operation;
mod price;
mod raw;

pub use amenities::{amenity_flags, detect_amenities, Amenity};
pub use canonical::{CanonicalListing, ListingLocation, OperationFlags, PhysicalAttributes};
pub use ingest::{ingest, IngestRejection};
pub use operation::Operation;
pub use price::{normalize, CanonicalPrice, OperationPrices};
pub use raw::{RawListing, RawPriceBlock};

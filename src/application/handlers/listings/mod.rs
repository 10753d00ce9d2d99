//! Listing snapshot command and query handlers.

mod get_listing_status;
mod reload_listings;

pub use get_listing_status::{GetListingStatusHandler, GetListingStatusQuery, ListingStatus};
pub use reload_listings::{ReloadListingsCommand, ReloadListingsHandler, ReloadListingsResult};

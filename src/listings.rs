use std::path::Path;

use crate::engine::ScheduleError;
use crate::limits::MAX_VISIBLE_LISTINGS;
use crate::model::Listing;

/// Parse a JSON array of listings with their stored rates.
pub fn parse_listings(json: &str) -> Result<Vec<Listing>, ScheduleError> {
    let listings: Vec<Listing> =
        serde_json::from_str(json).map_err(|e| ScheduleError::Listings(e.to_string()))?;
    if listings.len() > MAX_VISIBLE_LISTINGS {
        return Err(ScheduleError::LimitExceeded("too many listings"));
    }
    Ok(listings)
}

pub fn load_listings(path: &Path) -> Result<Vec<Listing>, ScheduleError> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| ScheduleError::Listings(format!("{}: {e}", path.display())))?;
    parse_listings(&json)
}

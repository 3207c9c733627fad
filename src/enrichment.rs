use crate::providers::{HotelOffer, StayQuery, StaySource};

/// Look up the booking deep-link for the chosen hotel.
///
/// Failures are logged and reported as `None`; a missing link never fails
/// the itinerary.
pub async fn stay_booking_url(
    source: &dyn StaySource,
    stay: &HotelOffer,
    query: &StayQuery,
) -> Option<String> {
    let hotel_id = &stay.condensed.hotel_id;
    match source.booking_url(hotel_id, query).await {
        Ok(Some(url)) => {
            tracing::debug!(%hotel_id, "Resolved booking URL");
            Some(url)
        }
        Ok(None) => {
            tracing::info!(%hotel_id, "Hotel details carry no booking URL");
            None
        }
        Err(e) => {
            tracing::warn!(%hotel_id, error = %e, "Booking URL lookup failed");
            None
        }
    }
}

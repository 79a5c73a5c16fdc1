//! Turns enriched venues into the canonical, proximity-sorted deal list.

use hhfind_core::model::MIN_VALIDITY_HOURS;
use hhfind_core::{distance_km, Coordinate, Deal, EnrichedVenue, ALERT_RADIUS_KM};

/// Builds one [`Deal`] per enriched venue, nearest first.
///
/// Validity is clamped to at least one hour. The sort is stable, so venues
/// at the same distance keep their discovery order.
#[must_use]
pub fn assemble(enriched: Vec<EnrichedVenue>, origin: Coordinate) -> Vec<Deal> {
    let mut deals: Vec<(f64, Deal)> = enriched
        .into_iter()
        .map(|venue| {
            let location = venue.candidate.coordinate;
            let deal = Deal {
                venue_name: venue.candidate.name,
                location,
                offer_details: venue.offer_description,
                validity_hours: venue.estimated_duration_hours.max(MIN_VALIDITY_HOURS),
                alert_radius_km: ALERT_RADIUS_KM,
                source_confirmed: venue.has_explicit_mention,
                venue_type: venue.venue_kind.label().to_string(),
            };
            (distance_km(origin, location), deal)
        })
        .collect();

    deals.sort_by(|(a, _), (b, _)| a.total_cmp(b));
    deals.into_iter().map(|(_, deal)| deal).collect()
}

//! Heuristic happy-hour inference over venue categories and review text.
//!
//! Classification is an ordered rule table; the first rule whose predicate
//! matches decides the offer text and the expected duration. A keyword hit in
//! the most recent reviews upgrades the offer to a "confirmed" one.

use hhfind_core::{EnrichedVenue, VenueCandidate, VenueKind};

/// Lowercase phrases that count as an explicit happy-hour mention in a
/// review. Matched as substrings; English only.
pub const MENTION_KEYWORDS: &[&str] = &[
    "happy hour",
    "drink special",
    "half price",
    "discount",
    "specials",
    "deal",
];

/// Only the most recent reviews are scanned.
const MAX_SCANNED_REVIEWS: usize = 5;

/// A mention never yields a shorter window than this.
const MIN_MENTIONED_DURATION_HOURS: f64 = 2.0;

const FALLBACK_DETAIL: &str = "discounted drinks/food";

struct Rule {
    matches: fn(&VenueCandidate) -> bool,
    headline: &'static str,
    /// Offer detail without trailing punctuation. `None` for the catch-all.
    detail: Option<&'static str>,
    duration_hours: f64,
}

fn is_lodging(c: &VenueCandidate) -> bool {
    c.has_any_category(&["lodging", "hotel"])
}

fn is_hotel_bar(c: &VenueCandidate) -> bool {
    is_lodging(c) && c.has_any_category(&["bar", "restaurant"])
}

fn is_bar(c: &VenueCandidate) -> bool {
    c.has_any_category(&["bar", "pub", "night_club"])
}

fn is_restaurant(c: &VenueCandidate) -> bool {
    c.has_category("restaurant")
}

fn any_venue(_: &VenueCandidate) -> bool {
    true
}

/// Last entry of [`RULES`]; matches every venue.
const CATCH_ALL: Rule = Rule {
    matches: any_venue,
    headline: "Potential happy hour",
    detail: None,
    duration_hours: 2.0,
};

const RULES: &[Rule] = &[
    Rule {
        matches: is_hotel_bar,
        headline: "Hotel Bar/Restaurant Happy Hour",
        detail: Some("Discounted cocktails, wine, beer, and perhaps small plates"),
        duration_hours: 2.5,
    },
    Rule {
        matches: is_lodging,
        headline: "Hotel Lobby Bar Happy Hour",
        detail: Some("Special deals on drinks and appetizers for guests and visitors"),
        duration_hours: 2.0,
    },
    Rule {
        matches: is_bar,
        headline: "Happy Hour",
        detail: Some("Discounted drinks and possibly appetizers"),
        duration_hours: 3.0,
    },
    Rule {
        matches: is_restaurant,
        headline: "Happy Hour",
        detail: Some("Special deals on drinks and appetizers"),
        duration_hours: 2.0,
    },
    CATCH_ALL,
];

impl Rule {
    fn offer(&self, venue_name: &str) -> String {
        match self.detail {
            Some(detail) => format!("{}: {detail}.", self.headline),
            None => format!("{} at {venue_name}.", self.headline),
        }
    }
}

/// Whether any of the first five review snippets mentions a happy-hour keyword.
#[must_use]
pub fn has_explicit_mention(review_snippets: &[String]) -> bool {
    review_snippets
        .iter()
        .take(MAX_SCANNED_REVIEWS)
        .map(|text| text.to_lowercase())
        .any(|text| MENTION_KEYWORDS.iter().any(|k| text.contains(k)))
}

/// Scores one candidate. Pure and total.
#[must_use]
pub fn infer(candidate: VenueCandidate) -> EnrichedVenue {
    let rule = RULES
        .iter()
        .find(|r| (r.matches)(&candidate))
        .unwrap_or(&CATCH_ALL);

    let mentioned = has_explicit_mention(&candidate.review_snippets);
    let (offer_description, estimated_duration_hours) = if mentioned {
        (
            format!(
                "Happy hour confirmed in recent reviews! Deals likely include: {}. Call to confirm current offers.",
                rule.detail.unwrap_or(FALLBACK_DETAIL)
            ),
            rule.duration_hours.max(MIN_MENTIONED_DURATION_HOURS),
        )
    } else {
        (rule.offer(&candidate.name), rule.duration_hours)
    };

    tracing::debug!(
        venue = %candidate.name,
        mentioned,
        duration_hours = estimated_duration_hours,
        "inferred happy hour"
    );

    let venue_kind = VenueKind::classify(&candidate);
    EnrichedVenue {
        candidate,
        offer_description,
        estimated_duration_hours,
        has_explicit_mention: mentioned,
        venue_kind,
    }
}

#[cfg(test)]
mod tests {
    use hhfind_core::Coordinate;

    use super::*;

    fn candidate(categories: &[&str], reviews: &[&str]) -> VenueCandidate {
        VenueCandidate {
            id: "p1".to_string(),
            name: "Corner Spot".to_string(),
            coordinate: Coordinate { lat: 0.0, lng: 0.0 },
            categories: categories.iter().map(|c| (*c).to_string()).collect(),
            address: String::new(),
            phone: None,
            website: None,
            rating: None,
            review_snippets: reviews.iter().map(|r| (*r).to_string()).collect(),
            opening_hours: Vec::new(),
            distance_km: None,
            category_order: categories.iter().map(|c| (*c).to_string()).collect(),
        }
    }

    #[test]
    fn hotel_with_bar_gets_hotel_bar_offer() {
        let e = infer(candidate(&["lodging", "bar"], &[]));
        assert_eq!(
            e.offer_description,
            "Hotel Bar/Restaurant Happy Hour: Discounted cocktails, wine, beer, and perhaps small plates."
        );
        assert!((e.estimated_duration_hours - 2.5).abs() < f64::EPSILON);
        assert_eq!(e.venue_kind, VenueKind::Hotel);
        assert!(!e.has_explicit_mention);
    }

    #[test]
    fn plain_lodging_gets_lobby_bar_offer() {
        let e = infer(candidate(&["lodging"], &["Nice rooms, friendly staff."]));
        assert!(e.offer_description.contains("Hotel Lobby Bar Happy Hour"));
        assert!((e.estimated_duration_hours - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn night_club_counts_as_bar() {
        let e = infer(candidate(&["night_club"], &[]));
        assert_eq!(
            e.offer_description,
            "Happy Hour: Discounted drinks and possibly appetizers."
        );
        assert!((e.estimated_duration_hours - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn restaurant_rule() {
        let e = infer(candidate(&["restaurant", "food"], &[]));
        assert_eq!(
            e.offer_description,
            "Happy Hour: Special deals on drinks and appetizers."
        );
        assert_eq!(e.venue_kind, VenueKind::Restaurant);
    }

    #[test]
    fn unknown_categories_fall_back_to_potential_offer() {
        let e = infer(candidate(&["bowling_alley"], &[]));
        assert_eq!(e.offer_description, "Potential happy hour at Corner Spot.");
        assert!((e.estimated_duration_hours - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn mention_confirms_offer_with_rule_detail() {
        let e = infer(candidate(&["bar"], &["Loved the Happy Hour special!"]));
        assert!(e.has_explicit_mention);
        assert_eq!(
            e.offer_description,
            "Happy hour confirmed in recent reviews! Deals likely include: Discounted drinks and possibly appetizers. Call to confirm current offers."
        );
        assert!((e.estimated_duration_hours - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn mention_on_fallback_rule_uses_generic_detail() {
        let e = infer(candidate(&[], &["great drink specials on fridays"]));
        assert!(e
            .offer_description
            .contains("Deals likely include: discounted drinks/food."));
        assert!(e.estimated_duration_hours >= 2.0);
    }

    #[test]
    fn only_first_five_reviews_are_scanned() {
        let reviews = ["ok", "fine", "meh", "nice", "good", "happy hour was great"];
        let e = infer(candidate(&["bar"], &reviews));
        assert!(!e.has_explicit_mention);
    }

    #[test]
    fn keywords_match_as_substrings() {
        assert!(has_explicit_mention(&["An ideal spot".to_string()]));
        assert!(has_explicit_mention(&["HALF PRICE wings".to_string()]));
        assert!(!has_explicit_mention(&["Quiet and cozy".to_string()]));
    }

    #[test]
    fn rule_table_ends_with_catch_all() {
        let last = RULES.last().expect("rule table is not empty");
        assert!((last.matches)(&candidate(&[], &[])));
        assert!((last.matches)(&candidate(&["bowling_alley"], &[])));
        assert!(last.detail.is_none());
    }

    #[test]
    fn duration_is_always_positive() {
        let cases: [&[&str]; 4] = [&["lodging", "restaurant"], &["pub"], &["cafe"], &[]];
        for cats in cases {
            assert!(infer(candidate(cats, &[])).estimated_duration_hours > 0.0);
        }
    }
}

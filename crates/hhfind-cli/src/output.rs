//! User-facing result rendering. Diagnostics go through `tracing`; this is
//! the only place that formats the final report for stdout.

use std::fmt::Write as _;

use hhfind_pipeline::{RunOutcome, Stage};

pub const CALL_AHEAD_TIP: &str = "Tip: Call ahead to confirm happy hour times and offers!";

/// Renders the final report for a finished run.
///
/// # Errors
///
/// Returns an error if a deal cannot be serialised to JSON.
pub fn render_outcome(outcome: &RunOutcome) -> Result<String, serde_json::Error> {
    let state = &outcome.state;
    let mut out = String::from("--- Happy Hour Finder Results ---\n");

    match outcome.stage {
        Stage::EndedWithError => {
            let message = state.error_message.as_deref().unwrap_or("unknown error");
            let _ = writeln!(out, "An error occurred: {message}");
        }
        Stage::EndedOk => {
            let _ = writeln!(
                out,
                "Found {} potential happy hour deals near {}:",
                state.deals.len(),
                state.location_label
            );
            for deal in &state.deals {
                let _ = writeln!(out, "{}", serde_json::to_string_pretty(deal)?);
            }
            if let Some(status) = &state.publish_status {
                let _ = writeln!(out, "\nDeal feed status: {status}");
            }
            let _ = writeln!(out, "\n{CALL_AHEAD_TIP}");
        }
        Stage::EndedNoDeals => {
            let _ = writeln!(
                out,
                "No happy hour deals found near {} in the selected radius. Try a different location or time!",
                state.location_label
            );
        }
        Stage::Collecting | Stage::Publishing => {}
    }
    Ok(out)
}

/// Process exit code for a terminal stage.
#[must_use]
pub fn exit_code(stage: Stage) -> u8 {
    match stage {
        Stage::EndedWithError => 2,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use hhfind_core::{Coordinate, Deal, PipelineState, ALERT_RADIUS_KM};

    use super::*;

    fn outcome(stage: Stage) -> RunOutcome {
        RunOutcome {
            stage,
            state: PipelineState::new(
                Coordinate {
                    lat: 40.7128,
                    lng: -74.006,
                },
                "New York, NY",
            ),
        }
    }

    #[test]
    fn deals_are_printed_as_json_with_status_and_tip() {
        let mut o = outcome(Stage::EndedOk);
        o.state.deals.push(Deal {
            venue_name: "The Tap".to_string(),
            location: Coordinate {
                lat: 40.713,
                lng: -74.005,
            },
            offer_details: "Happy Hour: Discounted drinks and possibly appetizers.".to_string(),
            validity_hours: 3.0,
            alert_radius_km: ALERT_RADIUS_KM,
            source_confirmed: false,
            venue_type: "Bar".to_string(),
        });
        o.state.publish_status = Some("published".to_string());

        let text = render_outcome(&o).unwrap();

        assert!(text.contains("Found 1 potential happy hour deals near New York, NY:"));
        assert!(text.contains("\"store_name\": \"The Tap\""));
        assert!(text.contains("Deal feed status: published"));
        assert!(text.ends_with(&format!("{CALL_AHEAD_TIP}\n")));
    }

    #[test]
    fn no_deals_message_names_the_location() {
        let text = render_outcome(&outcome(Stage::EndedNoDeals)).unwrap();
        assert!(text.contains("No happy hour deals found near New York, NY"));
    }

    #[test]
    fn error_message_is_shown() {
        let mut o = outcome(Stage::EndedWithError);
        o.state.error_message = Some("Error in data collection: boom".to_string());
        let text = render_outcome(&o).unwrap();
        assert!(text.contains("An error occurred: Error in data collection: boom"));
    }

    #[test]
    fn only_errors_exit_non_zero() {
        assert_eq!(exit_code(Stage::EndedOk), 0);
        assert_eq!(exit_code(Stage::EndedNoDeals), 0);
        assert_eq!(exit_code(Stage::EndedWithError), 2);
    }
}

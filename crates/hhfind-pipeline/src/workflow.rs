//! The discovery → publish state machine.
//!
//! ```text
//! Collecting ──┬─> Publishing ──┬─> EndedOk
//!              │                └─> EndedWithError
//!              ├─> EndedNoDeals
//!              └─> EndedWithError
//! ```
//!
//! No retries and no cycles: every run visits at most two working stages.

use std::fmt;

use hhfind_core::{Coordinate, PipelineState};
use hhfind_places::VenueSource;

use crate::assemble::assemble;
use crate::inference::infer;
use crate::publish::Publisher;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Collecting,
    Publishing,
    EndedNoDeals,
    EndedWithError,
    EndedOk,
}

impl Stage {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::EndedNoDeals | Self::EndedWithError | Self::EndedOk)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Collecting => "collecting",
            Self::Publishing => "publishing",
            Self::EndedNoDeals => "ended_no_deals",
            Self::EndedWithError => "ended_with_error",
            Self::EndedOk => "ended_ok",
        };
        f.write_str(name)
    }
}

/// Routing decision after collection. Pure.
#[must_use]
pub fn decide(state: &PipelineState) -> Stage {
    if state.error_message.is_some() {
        Stage::EndedWithError
    } else if state.deals.is_empty() {
        Stage::EndedNoDeals
    } else {
        Stage::Publishing
    }
}

/// Terminal stage plus the final state of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub stage: Stage,
    pub state: PipelineState,
}

pub struct WorkflowEngine<S, P> {
    source: S,
    publisher: P,
    radius_km: f64,
}

impl<S: VenueSource, P: Publisher> WorkflowEngine<S, P> {
    pub fn new(source: S, publisher: P, radius_km: f64) -> Self {
        Self {
            source,
            publisher,
            radius_km,
        }
    }

    /// Runs one origin through the pipeline. Never fails; errors end up in
    /// [`PipelineState::error_message`] with [`Stage::EndedWithError`].
    pub async fn run(&self, origin: Coordinate, location_label: &str) -> RunOutcome {
        let mut state = PipelineState::new(origin, location_label);
        let mut stage = Stage::Collecting;
        tracing::info!(%origin, location = location_label, "workflow started");

        while !stage.is_terminal() {
            let next = match stage {
                Stage::Collecting => {
                    self.collect(&mut state).await;
                    decide(&state)
                }
                Stage::Publishing => self.publish(&mut state).await,
                terminal => terminal,
            };
            tracing::info!(from = %stage, to = %next, "workflow transition");
            stage = next;
        }

        RunOutcome { stage, state }
    }

    async fn collect(&self, state: &mut PipelineState) {
        match self.source.discover(state.origin, self.radius_km).await {
            Ok(candidates) => {
                let enriched = candidates.into_iter().map(infer).collect();
                state.deals = assemble(enriched, state.origin);
                tracing::info!(deals = state.deals.len(), "data collection finished");
            }
            Err(e) => {
                tracing::error!(error = %e, "data collection failed");
                state.error_message = Some(format!("Error in data collection: {e}"));
            }
        }
    }

    async fn publish(&self, state: &mut PipelineState) -> Stage {
        match self.publisher.publish(&state.deals).await {
            Ok(status) => {
                tracing::info!(status = %status, "deal feed published");
                state.publish_status = Some(status);
                Stage::EndedOk
            }
            Err(e) => {
                tracing::error!(error = %e, "deal publisher failed");
                state.error_message = Some(format!("Error in deal publisher: {e}"));
                Stage::EndedWithError
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use hhfind_core::{Deal, ALERT_RADIUS_KM};

    use super::*;

    fn state() -> PipelineState {
        PipelineState::new(Coordinate { lat: 0.0, lng: 0.0 }, "Nowhere")
    }

    fn deal() -> Deal {
        Deal {
            venue_name: "x".to_string(),
            location: Coordinate { lat: 0.0, lng: 0.0 },
            offer_details: "x".to_string(),
            validity_hours: 2.0,
            alert_radius_km: ALERT_RADIUS_KM,
            source_confirmed: false,
            venue_type: "Bar".to_string(),
        }
    }

    #[test]
    fn decide_routes_error_first() {
        let mut s = state();
        s.deals.push(deal());
        s.error_message = Some("boom".to_string());
        assert_eq!(decide(&s), Stage::EndedWithError);
    }

    #[test]
    fn decide_routes_empty_to_no_deals() {
        assert_eq!(decide(&state()), Stage::EndedNoDeals);
    }

    #[test]
    fn decide_routes_deals_to_publishing() {
        let mut s = state();
        s.deals.push(deal());
        assert_eq!(decide(&s), Stage::Publishing);
    }

    #[test]
    fn only_ended_stages_are_terminal() {
        assert!(!Stage::Collecting.is_terminal());
        assert!(!Stage::Publishing.is_terminal());
        assert!(Stage::EndedOk.is_terminal());
        assert!(Stage::EndedNoDeals.is_terminal());
        assert!(Stage::EndedWithError.is_terminal());
    }
}

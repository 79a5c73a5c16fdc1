//! Happy-hour inference, deal assembly, and the discovery → publish workflow.
//!
//! One run takes an origin coordinate through [`WorkflowEngine::run`]:
//! collect venues from a [`VenueSource`](hhfind_places::VenueSource), score
//! them with [`infer`], turn them into sorted [`Deal`](hhfind_core::Deal)s
//! with [`assemble`], then either hand the deals to a [`Publisher`] or stop.

pub mod assemble;
pub mod inference;
pub mod publish;
pub mod workflow;

pub use assemble::assemble;
pub use inference::{infer, MENTION_KEYWORDS};
pub use publish::{
    Notifier, PublishError, PublishStub, Publisher, PUBLISH_FAILED_STATUS, PUBLISH_OK_STATUS,
};
pub use workflow::{decide, RunOutcome, Stage, WorkflowEngine};

//! Chain walker: state machine that steps through an automation

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::automation::Automation;
use crate::models::step::Step;

/// Reply given once the chain has run out of steps
pub const FLOW_ENDED_MESSAGE: &str = "Flow ended. No further steps are configured.";

/// Reply given when the automation has no trigger step
pub const NO_ENTRY_POINT_MESSAGE: &str =
    "This flow has no entry point. Add a trigger step to start the simulation.";

/// Walker state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "stepId", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WalkerState {
    /// No input received yet
    #[default]
    NotStarted,

    /// Positioned at a step whose reply has been produced
    AtStep(String),

    /// Nothing left to follow (absorbing)
    Terminated,
}

/// Outcome of one advance
#[derive(Debug, Clone, PartialEq)]
pub enum Advance<'a> {
    /// Arrived at a step; its reply must be produced
    Arrived(&'a Step),

    /// First input on an automation without a trigger
    NoEntryPoint,

    /// The current step had no resolvable successor
    Ended,

    /// Input received after termination
    AlreadyTerminated,
}

impl Advance<'_> {
    /// Fixed reply for outcomes that do not arrive at a step
    pub fn fixed_reply(&self) -> Option<&'static str> {
        match self {
            Advance::Arrived(_) => None,
            Advance::NoEntryPoint => Some(NO_ENTRY_POINT_MESSAGE),
            Advance::Ended | Advance::AlreadyTerminated => Some(FLOW_ENDED_MESSAGE),
        }
    }
}

/// Chooses the step that follows `current`.
///
/// This is where conditional dispatch over `branches` would plug in; the
/// walker itself never evaluates conditions.
pub trait StepRouter: Send + Sync {
    fn next<'a>(&self, automation: &'a Automation, current: &Step) -> Option<&'a Step>;
}

/// Follows `next_step_id` only. CONDITION steps are treated like any other.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearRouter;

impl StepRouter for LinearRouter {
    fn next<'a>(&self, automation: &'a Automation, current: &Step) -> Option<&'a Step> {
        let next_id = current.next_step_id.as_deref()?;
        let next = automation.step(next_id);
        if next.is_none() {
            warn!("Step {} links to missing step {}", current.id, next_id);
        }
        next
    }
}

/// Chain walker over a single automation
#[derive(Debug, Clone, Default)]
pub struct ChainWalker<R: StepRouter = LinearRouter> {
    state: WalkerState,
    router: R,
}

impl ChainWalker<LinearRouter> {
    /// Create a walker in the not-started state
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: StepRouter> ChainWalker<R> {
    /// Create a walker with a custom router
    pub fn with_router(router: R) -> Self {
        Self {
            state: WalkerState::NotStarted,
            router,
        }
    }

    /// Get current state
    pub fn state(&self) -> &WalkerState {
        &self.state
    }

    pub fn is_terminated(&self) -> bool {
        self.state == WalkerState::Terminated
    }

    /// Process one user input and transition
    pub fn advance<'a>(&mut self, automation: &'a Automation) -> Advance<'a> {
        let outcome = match &self.state {
            WalkerState::NotStarted => match automation.trigger() {
                Some(trigger) => {
                    if automation.steps.iter().filter(|s| s.is_trigger()).count() > 1 {
                        warn!("{} has several triggers, starting at {}", automation.id, trigger.id);
                    }
                    Advance::Arrived(trigger)
                }
                None => Advance::NoEntryPoint,
            },
            WalkerState::AtStep(current_id) => match automation.step(current_id) {
                Some(current) => match self.router.next(automation, current) {
                    Some(next) => Advance::Arrived(next),
                    None => Advance::Ended,
                },
                None => Advance::Ended,
            },
            WalkerState::Terminated => Advance::AlreadyTerminated,
        };

        let new_state = match &outcome {
            Advance::Arrived(step) => WalkerState::AtStep(step.id.clone()),
            _ => WalkerState::Terminated,
        };
        debug!("Walker {:?} -> {:?}", self.state, new_state);
        self.state = new_state;
        outcome
    }

    /// Back to the not-started state
    pub fn reset(&mut self) {
        self.state = WalkerState::NotStarted;
    }
}

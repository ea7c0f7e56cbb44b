//! Onboarding state machine.
//!
//! The wizard is linear: profile, username, traits, brands, colors. Which
//! step a user is on is always derived from the flags on their record, never
//! from the route they happen to be visiting.

use serde::{Deserialize, Serialize};

/// A step in the onboarding wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingStep {
    Profile,
    Username,
    Traits,
    Brands,
    Colors,
    Complete,
}

/// Steps that must be satisfied, in order. `Complete` is terminal.
pub const REQUIRED_STEPS: [OnboardingStep; 5] = [
    OnboardingStep::Profile,
    OnboardingStep::Username,
    OnboardingStep::Traits,
    OnboardingStep::Brands,
    OnboardingStep::Colors,
];

/// Route the client is sent to once onboarding is complete.
pub const COMPLETE_ROUTE: &str = "/home";

impl OnboardingStep {
    /// Client route for this step.
    pub fn route(self) -> &'static str {
        match self {
            Self::Profile => "/onboarding/profile",
            Self::Username => "/onboarding/username",
            Self::Traits => "/onboarding/traits",
            Self::Brands => "/onboarding/brands",
            Self::Colors => "/onboarding/colors",
            Self::Complete => COMPLETE_ROUTE,
        }
    }

    /// Integer cursor persisted on the user row (`onboarding_step`).
    pub fn cursor(self) -> i32 {
        match self {
            Self::Profile => 0,
            Self::Username => 1,
            Self::Traits => 2,
            Self::Brands => 3,
            Self::Colors => 4,
            Self::Complete => 5,
        }
    }
}

/// Facts about a user record that drive the state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OnboardingFlags {
    pub has_name: bool,
    pub has_username: bool,
    pub has_traits: bool,
    pub has_brands: bool,
    pub has_colors: bool,
    /// Admin identities skip onboarding entirely.
    pub is_admin: bool,
}

impl OnboardingFlags {
    fn is_met(&self, step: OnboardingStep) -> bool {
        match step {
            OnboardingStep::Profile => self.has_name,
            OnboardingStep::Username => self.has_username,
            OnboardingStep::Traits => self.has_traits,
            OnboardingStep::Brands => self.has_brands,
            OnboardingStep::Colors => self.has_colors,
            OnboardingStep::Complete => true,
        }
    }
}

/// First unmet step, or [`OnboardingStep::Complete`].
pub fn next_step(flags: &OnboardingFlags) -> OnboardingStep {
    if flags.is_admin {
        return OnboardingStep::Complete;
    }
    REQUIRED_STEPS
        .into_iter()
        .find(|step| !flags.is_met(*step))
        .unwrap_or(OnboardingStep::Complete)
}

/// Where a caller visiting `requested` should go instead, if anywhere.
///
/// Returns `None` when `requested` is the correct step.
pub fn resolve_redirect(
    flags: &OnboardingFlags,
    requested: OnboardingStep,
) -> Option<&'static str> {
    let expected = next_step(flags);
    if expected == requested {
        None
    } else {
        Some(expected.route())
    }
}

/// Share of required steps satisfied, as a whole percentage.
pub fn completion_percentage(flags: &OnboardingFlags) -> i32 {
    if flags.is_admin {
        return 100;
    }
    let met = REQUIRED_STEPS
        .iter()
        .filter(|step| flags.is_met(**step))
        .count();
    // Both operands are at most 5.
    (met * 100 / REQUIRED_STEPS.len()) as i32
}

/// Derived progress persisted on the user row after every mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OnboardingProgress {
    pub next_step: OnboardingStep,
    pub route: &'static str,
    pub completion_percentage: i32,
    pub is_onboarded: bool,
}

impl OnboardingProgress {
    pub fn from_flags(flags: &OnboardingFlags) -> Self {
        let next_step = next_step(flags);
        Self {
            next_step,
            route: next_step.route(),
            completion_percentage: completion_percentage(flags),
            is_onboarded: next_step == OnboardingStep::Complete,
        }
    }
}

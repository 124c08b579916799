//! Declarative step table. Adding a step is a change to `STEPS`, not to the
//! controller.

use serde::Serialize;

use crate::wizard::validation::Field;

pub const FIRST_STEP: u8 = 1;
pub const SUMMARY_STEP: u8 = 5;
pub const COMPLETED_STEP: u8 = 6;

/// What a step demands before the wizard may leave it going forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Fields(&'static [Field]),
    FullRecord,
    Terminal,
}

#[derive(Debug, Clone, Copy)]
pub struct StepSpec {
    pub number: u8,
    pub label: &'static str,
    pub gate: Gate,
}

pub const STEPS: &[StepSpec] = &[
    StepSpec {
        number: 1,
        label: "Upload Resume",
        gate: Gate::Fields(&[Field::Resume]),
    },
    StepSpec {
        number: 2,
        label: "Basic Info",
        gate: Gate::Fields(&[Field::FirstName, Field::LastName, Field::Email, Field::Phone]),
    },
    StepSpec {
        number: 3,
        label: "Skill Set",
        gate: Gate::Fields(&[Field::Skills]),
    },
    StepSpec {
        number: 4,
        label: "Education",
        gate: Gate::Fields(&[Field::Education]),
    },
    StepSpec {
        number: SUMMARY_STEP,
        label: "Summary",
        gate: Gate::FullRecord,
    },
    StepSpec {
        number: COMPLETED_STEP,
        label: "Completed",
        gate: Gate::Terminal,
    },
];

pub fn spec(step: u8) -> Option<&'static StepSpec> {
    STEPS.iter().find(|s| s.number == step)
}

pub fn is_valid_step(step: u8) -> bool {
    spec(step).is_some()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Completed,
    Active,
    Upcoming,
}

/// One item of the step indicator. Selecting it issues a jump to `number`.
#[derive(Debug, Clone, Serialize)]
pub struct StepIndicator {
    pub number: u8,
    pub label: &'static str,
    pub status: StepStatus,
}

pub fn indicator(current: u8) -> Vec<StepIndicator> {
    STEPS
        .iter()
        .map(|s| {
            let status = if s.number < current || current == COMPLETED_STEP {
                StepStatus::Completed
            } else if s.number == current {
                StepStatus::Active
            } else {
                StepStatus::Upcoming
            };
            StepIndicator {
                number: s.number,
                label: s.label,
                status,
            }
        })
        .collect()
}

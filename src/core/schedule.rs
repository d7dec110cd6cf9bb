//! Pipeline schedule

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// When a scheduled pipeline run actually builds an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StartCondition {
    /// Build on every schedule match
    ExpressionMatchOnly,
    /// Build only when a recipe dependency has a newer version
    ExpressionMatchAndDependencyUpdatesAvailable,
}

/// Schedule for an image pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(rename(serialize = "PipelineExecutionStartCondition"))]
    pub start_condition: StartCondition,

    #[serde(rename(serialize = "ScheduleExpression"))]
    pub schedule_expression: Cow<'static, str>,
}

/// Every Monday at 10:00 UTC, whether or not dependencies changed.
///
/// The Deadline component can't signal that a new release exists, so waiting
/// for dependency updates would never trigger a build.
pub const DEFAULT_SCHEDULE: Schedule = Schedule {
    start_condition: StartCondition::ExpressionMatchOnly,
    schedule_expression: Cow::Borrowed("cron(0 10 * * 1)"),
};

impl Schedule {
    pub fn new(start_condition: StartCondition, schedule_expression: impl Into<String>) -> Self {
        Self {
            start_condition,
            schedule_expression: Cow::Owned(schedule_expression.into()),
        }
    }
}

impl Default for Schedule {
    fn default() -> Self {
        DEFAULT_SCHEDULE
    }
}

//! The ordered set of booking rules an entry must pass before it is saved.
//!
//! Rules run in a fixed order and the first failure wins. Each rule is independent and
//! only reads: conflict rules query the entry repository, the rest look at the candidate
//! and the diary configuration.

use std::sync::Arc;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use tracing::debug;
use crate::config::DiaryConfig;
use crate::domain::models::{
    entry::{ConflictScope, Entry},
    treatment::Treatment,
    user::Editor,
};
use crate::domain::ports::EntryRepository;
use crate::domain::services::interval::{overlaps, TimeInterval};
use crate::error::{AppError, BookingError};

/// Everything a rule may look at.
pub struct RuleContext<'a> {
    pub entry: &'a Entry,
    pub interval: TimeInterval,
    pub treatment: Option<&'a Treatment>,
    pub editor: &'a Editor,
    pub now: NaiveDateTime,
    pub config: &'a DiaryConfig,
    pub entries: &'a dyn EntryRepository,
}

#[async_trait]
pub trait EntryRule: Send + Sync {
    fn name(&self) -> &'static str;
    async fn check(&self, ctx: &RuleContext<'_>) -> Result<(), AppError>;
}

pub struct ResourceRequirementRule;

#[async_trait]
impl EntryRule for ResourceRequirementRule {
    fn name(&self) -> &'static str {
        "resource_requirement"
    }

    async fn check(&self, ctx: &RuleContext<'_>) -> Result<(), AppError> {
        if ctx.treatment.is_some_and(|t| t.resource_required) && ctx.entry.resource_id.is_none() {
            return Err(BookingError::MissingResource.into());
        }
        Ok(())
    }
}

pub struct MinimumDurationRule;

#[async_trait]
impl EntryRule for MinimumDurationRule {
    fn name(&self) -> &'static str {
        "minimum_duration"
    }

    async fn check(&self, ctx: &RuleContext<'_>) -> Result<(), AppError> {
        if let Some(min) = ctx.treatment.and_then(Treatment::min_duration)
            && ctx.interval.duration < min {
            return Err(BookingError::InsufficientDuration.into());
        }
        Ok(())
    }
}

/// Looks for an active entry in `scope` that overlaps the candidate.
async fn find_clash(ctx: &RuleContext<'_>, scope: ConflictScope<'_>) -> Result<Option<Entry>, AppError> {
    let others = ctx.entries
        .find_active_in_scope(ctx.entry.date, scope, Some(&ctx.entry.id))
        .await?;

    Ok(others.into_iter()
        .find(|other| other.id != ctx.entry.id && overlaps(&ctx.interval, &other.interval())))
}

pub struct ResourceConflictRule;

#[async_trait]
impl EntryRule for ResourceConflictRule {
    fn name(&self) -> &'static str {
        "resource_conflict"
    }

    async fn check(&self, ctx: &RuleContext<'_>) -> Result<(), AppError> {
        if !ctx.entry.is_active() {
            return Ok(());
        }
        if let Some(resource_id) = ctx.entry.resource_id.as_deref()
            && let Some(other) = find_clash(ctx, ConflictScope::Resource(resource_id)).await? {
            debug!(entry_id = %ctx.entry.id, other_id = %other.id, "resource clash");
            return Err(BookingError::ResourceConflict.into());
        }
        Ok(())
    }
}

pub struct DoubleBookingRule;

#[async_trait]
impl EntryRule for DoubleBookingRule {
    fn name(&self) -> &'static str {
        "double_booking"
    }

    async fn check(&self, ctx: &RuleContext<'_>) -> Result<(), AppError> {
        if !ctx.entry.is_active() {
            return Ok(());
        }
        if let Some(customer_id) = ctx.entry.customer_id.as_deref()
            && let Some(other) = find_clash(ctx, ConflictScope::Customer(customer_id)).await? {
            debug!(entry_id = %ctx.entry.id, other_id = %other.id, "customer double booked");
            return Err(BookingError::DoubleBooking.into());
        }
        Ok(())
    }
}

pub struct TradingHoursRule;

#[async_trait]
impl EntryRule for TradingHoursRule {
    fn name(&self) -> &'static str {
        "trading_hours"
    }

    async fn check(&self, ctx: &RuleContext<'_>) -> Result<(), AppError> {
        if ctx.editor.is_staff {
            return Ok(());
        }
        let hours = ctx.config.hours_for(ctx.entry.date);
        if hours.opening == hours.closing
            || ctx.interval.start < hours.opening
            || ctx.interval.end_at() > ctx.entry.date.and_time(hours.closing) {
            return Err(BookingError::OutOfHours.into());
        }
        Ok(())
    }
}

pub struct BookingWindowRule;

#[async_trait]
impl EntryRule for BookingWindowRule {
    fn name(&self) -> &'static str {
        "booking_window"
    }

    async fn check(&self, ctx: &RuleContext<'_>) -> Result<(), AppError> {
        if ctx.editor.is_staff {
            return Ok(());
        }
        if ctx.interval.start_at() < ctx.now {
            return Err(BookingError::PastBooking.into());
        }
        if ctx.entry.date < ctx.config.booking_threshold(ctx.now.date()) {
            return Err(BookingError::AdvanceBooking(ctx.config.min_booking_days).into());
        }
        Ok(())
    }
}

pub struct RuleEngine {
    entries: Arc<dyn EntryRepository>,
    config: DiaryConfig,
    rules: Vec<Box<dyn EntryRule>>,
}

impl RuleEngine {
    pub fn new(entries: Arc<dyn EntryRepository>, config: DiaryConfig) -> Self {
        let rules: Vec<Box<dyn EntryRule>> = vec![
            Box::new(ResourceRequirementRule),
            Box::new(MinimumDurationRule),
            Box::new(ResourceConflictRule),
            Box::new(DoubleBookingRule),
            Box::new(TradingHoursRule),
            Box::new(BookingWindowRule),
        ];
        Self { entries, config, rules }
    }

    pub fn config(&self) -> &DiaryConfig {
        &self.config
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Runs every rule in order and returns the first failure.
    ///
    /// `treatment` must be the treatment the entry refers to, already loaded.
    pub async fn validate(
        &self,
        entry: &Entry,
        treatment: Option<&Treatment>,
        editor: &Editor,
        now: NaiveDateTime,
    ) -> Result<(), AppError> {
        if entry.duration_min < 0 {
            return Err(AppError::Validation("Duration cannot be negative".into()));
        }
        let interval = entry.interval();
        if !interval.fits_in_day() {
            return Err(BookingError::CrossesMidnight.into());
        }

        let ctx = RuleContext {
            entry,
            interval,
            treatment,
            editor,
            now,
            config: &self.config,
            entries: self.entries.as_ref(),
        };

        for rule in &self.rules {
            debug!(rule = rule.name(), entry_id = %entry.id, "checking entry rule");
            rule.check(&ctx).await?;
        }
        Ok(())
    }
}

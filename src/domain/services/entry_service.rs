use std::sync::Arc;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::{info, warn};
use crate::config::DiaryConfig;
use crate::domain::models::{entry::Entry, treatment::Treatment, user::Editor};
use crate::domain::ports::{CustomerRepository, EntryRepository, ResourceRepository, TreatmentRepository};
use crate::domain::services::rules::RuleEngine;
use crate::error::AppError;

/// Administrative status an entry can be given after the fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAction {
    Cancel,
    NoShow,
}

impl std::str::FromStr for StatusAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cancel" => Ok(StatusAction::Cancel),
            "no_show" => Ok(StatusAction::NoShow),
            other => Err(AppError::NotFound(format!("Unknown entry action: {}", other))),
        }
    }
}

/// Creates, edits and moves entries, running each write through the rule engine.
pub struct EntryService {
    entries: Arc<dyn EntryRepository>,
    treatments: Arc<dyn TreatmentRepository>,
    resources: Arc<dyn ResourceRepository>,
    customers: Arc<dyn CustomerRepository>,
    engine: RuleEngine,
}

impl EntryService {
    pub fn new(
        entries: Arc<dyn EntryRepository>,
        treatments: Arc<dyn TreatmentRepository>,
        resources: Arc<dyn ResourceRepository>,
        customers: Arc<dyn CustomerRepository>,
        config: DiaryConfig,
    ) -> Self {
        let engine = RuleEngine::new(entries.clone(), config);
        Self { entries, treatments, resources, customers, engine }
    }

    pub fn config(&self) -> &DiaryConfig {
        self.engine.config()
    }

    pub fn now(&self) -> NaiveDateTime {
        self.config().local_now()
    }

    async fn load_treatment(&self, entry: &Entry) -> Result<Option<Treatment>, AppError> {
        match &entry.treatment_id {
            Some(id) => self.treatments.find_by_id(id).await?
                .map(Some)
                .ok_or(AppError::Validation(format!("Treatment {} does not exist", id))),
            None => Ok(None),
        }
    }

    async fn check_references(&self, entry: &Entry) -> Result<(), AppError> {
        if let Some(id) = &entry.resource_id
            && self.resources.find_by_id(id).await?.is_none() {
            return Err(AppError::Validation(format!("Resource {} does not exist", id)));
        }
        if let Some(id) = &entry.customer_id
            && self.customers.find_by_id(id).await?.is_none() {
            return Err(AppError::Validation(format!("Customer {} does not exist", id)));
        }
        Ok(())
    }

    /// Booking rules first, then plain field and reference checks.
    pub async fn validate(&self, entry: &Entry, editor: &Editor, now: NaiveDateTime) -> Result<(), AppError> {
        let treatment = self.load_treatment(entry).await?;
        self.engine.validate(entry, treatment.as_ref(), editor, now).await?;
        entry.validate_fields()?;
        self.check_references(entry).await
    }

    pub async fn create(&self, entry: Entry, editor: &Editor) -> Result<Entry, AppError> {
        self.create_at(entry, editor, self.now()).await
    }

    pub async fn create_at(&self, mut entry: Entry, editor: &Editor, now: NaiveDateTime) -> Result<Entry, AppError> {
        entry.creator_id = Some(editor.id.clone());
        entry.editor_id = Some(editor.id.clone());
        self.validate(&entry, editor, now).await?;

        let created = self.entries.create(&entry).await?;
        info!(entry_id = %created.id, editor = %editor.username, "Entry created for {} {}", created.date, created.time);
        Ok(created)
    }

    pub async fn update(&self, entry: Entry, editor: &Editor) -> Result<Entry, AppError> {
        self.update_at(entry, editor, self.now()).await
    }

    pub async fn update_at(&self, mut entry: Entry, editor: &Editor, now: NaiveDateTime) -> Result<Entry, AppError> {
        entry.editor_id = Some(editor.id.clone());
        self.validate(&entry, editor, now).await?;

        let updated = self.entries.update(&entry).await?;
        info!(entry_id = %updated.id, editor = %editor.username, "Entry updated");
        Ok(updated)
    }

    pub async fn find(&self, id: &str) -> Result<Entry, AppError> {
        self.entries.find_by_id(id).await?
            .ok_or(AppError::NotFound("Entry not found".into()))
    }

    pub async fn move_entry(&self, id: &str, date: NaiveDate, time: NaiveTime, editor: &Editor) -> Result<Entry, AppError> {
        self.move_entry_at(id, date, time, editor, self.now()).await
    }

    /// Drag-and-drop move to a new date and time.
    ///
    /// Moving clears the cancelled and no-show flags. If the target is taken, the entry
    /// is tried once more directly after the first entry starting inside the target's
    /// time slot, provided that entry finishes before the slot does.
    pub async fn move_entry_at(
        &self,
        id: &str,
        date: NaiveDate,
        time: NaiveTime,
        editor: &Editor,
        now: NaiveDateTime,
    ) -> Result<Entry, AppError> {
        let mut entry = self.find(id).await?;
        entry.date = date;
        entry.time = time;
        entry.cancelled = false;
        entry.no_show = false;

        let original = match self.update_at(entry.clone(), editor, now).await {
            Ok(moved) => return Ok(moved),
            Err(e @ AppError::Booking(_)) => e,
            Err(e) => return Err(e),
        };

        let slot_end = date.and_time(time) + self.config().time_inc;
        let blocker = self.entries.find_next_active(date, time, Some(&entry.id)).await?
            .filter(|other| other.interval().start_at() < slot_end);

        let Some(blocker) = blocker else {
            return Err(original);
        };

        let blocker_end = blocker.interval().end_at();
        if blocker_end >= slot_end || blocker_end.date() != date {
            // no room left in this slot
            return Err(original);
        }

        warn!(
            entry_id = %entry.id,
            blocker_id = %blocker.id,
            "Move to {} {} rejected ({}); retrying at {}", date, time, original, blocker_end.time()
        );
        entry.time = blocker_end.time();
        self.update_at(entry, editor, now).await
    }

    pub async fn set_status(&self, id: &str, action: StatusAction, editor: &Editor) -> Result<Entry, AppError> {
        self.set_status_at(id, action, editor, self.now()).await
    }

    pub async fn set_status_at(
        &self,
        id: &str,
        action: StatusAction,
        editor: &Editor,
        now: NaiveDateTime,
    ) -> Result<Entry, AppError> {
        let mut entry = self.find(id).await?;
        entry.cancelled = action == StatusAction::Cancel;
        entry.no_show = action == StatusAction::NoShow;
        self.update_at(entry, editor, now).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.entries.delete(id).await?;
        info!(entry_id = %id, "Entry deleted");
        Ok(())
    }

    /// Entries still to come today, and all of tomorrow's. Customers only see their own
    /// entries that have not been cancelled.
    pub async fn reminders_at(&self, editor: &Editor, now: NaiveDateTime) -> Result<Vec<Entry>, AppError> {
        let today = now.date();
        let tomorrow = today + Duration::days(1);
        let customer_id = if editor.is_staff { None } else { editor.customer_id.as_deref() };

        if !editor.is_staff && customer_id.is_none() {
            return Ok(Vec::new());
        }
        self.entries.list_upcoming(today, now.time(), tomorrow, customer_id).await
    }

    pub async fn reminders(&self, editor: &Editor) -> Result<Vec<Entry>, AppError> {
        self.reminders_at(editor, self.now()).await
    }

    /// Deletes every entry dated before `cutoff`.
    pub async fn cleanup_before(&self, cutoff: NaiveDate) -> Result<u64, AppError> {
        let deleted = self.entries.delete_before(cutoff).await?;
        info!(deleted, "Cleaned entries prior to {}", cutoff);
        Ok(deleted)
    }
}

/// Works out the clean-up cut-off date. A positive `age` (in years) wins over `before`;
/// the result must lie before `today`.
pub fn cleanup_cutoff(today: NaiveDate, age: u32, before: Option<NaiveDate>) -> Result<NaiveDate, AppError> {
    let cutoff = if age > 0 {
        let years = i32::try_from(age)
            .map_err(|_| AppError::Validation(format!("Age {} is out of range", age)))?;
        let year = today.year().checked_sub(years)
            .ok_or_else(|| AppError::Validation(format!("Age {} is out of range", age)))?;
        today.with_year(year)
            .or_else(|| NaiveDate::from_ymd_opt(year, today.month(), 28))
    } else {
        before
    };

    match cutoff {
        Some(date) if date < today => Ok(date),
        _ => Err(AppError::Validation("Specify a valid before date or an age".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use crate::domain::models::{resource::Resource, treatment::Treatment};
    use crate::domain::services::test_support::{
        entry_at, non_staff, staff, MemoryCustomerRepo, MemoryEntryRepo, MemoryResourceRepo, MemoryTreatmentRepo,
    };
    use crate::error::BookingError;

    // 2030-01-07 is a Monday
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 1, 7).unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn long_ago() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2029, 12, 1).unwrap().and_time(at(8, 0))
    }

    struct Fixture {
        entries: Arc<MemoryEntryRepo>,
        resources: Arc<MemoryResourceRepo>,
        treatments: Arc<MemoryTreatmentRepo>,
        service: EntryService,
    }

    fn fixture(time_inc_min: i64) -> Fixture {
        let entries = Arc::new(MemoryEntryRepo::default());
        let resources = Arc::new(MemoryResourceRepo::default());
        let treatments = Arc::new(MemoryTreatmentRepo::default());
        let customers = Arc::new(MemoryCustomerRepo::default());
        let config = DiaryConfig { time_inc: Duration::minutes(time_inc_min), ..DiaryConfig::default() };
        let service = EntryService::new(entries.clone(), treatments.clone(), resources.clone(), customers, config);
        Fixture { entries, resources, treatments, service }
    }

    async fn room(f: &Fixture) -> String {
        f.resources.create(&Resource::new("Room 1".into(), String::new())).await.unwrap().id
    }

    #[tokio::test]
    async fn test_create_sets_creator_and_editor() {
        let f = fixture(60);
        let created = f.service.create_at(entry_at(monday(), 12, 0, 60), &staff(), long_ago()).await.unwrap();
        assert_eq!(created.creator_id.as_deref(), Some("staff-1"));
        assert_eq!(created.editor_id.as_deref(), Some("staff-1"));
        assert!(f.entries.get(&created.id).is_some());
    }

    #[tokio::test]
    async fn test_unknown_references_are_rejected_after_rules() {
        let f = fixture(60);
        let mut entry = entry_at(monday(), 12, 0, 60);
        entry.resource_id = Some("missing".into());
        assert_matches!(f.service.create_at(entry, &staff(), long_ago()).await, Err(AppError::Validation(_)));

        let mut entry = entry_at(monday(), 12, 0, 60);
        entry.treatment_id = Some("missing".into());
        assert_matches!(f.service.create_at(entry, &staff(), long_ago()).await, Err(AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_treatment_rules_through_service() {
        let f = fixture(60);
        let treatment = f.treatments.create(&Treatment::new("Massage".into(), Some(60), true)).await.unwrap();
        let room = room(&f).await;

        let mut entry = entry_at(monday(), 12, 0, 0);
        entry.treatment_id = Some(treatment.id.clone());
        assert_matches!(
            f.service.create_at(entry.clone(), &staff(), long_ago()).await,
            Err(AppError::Booking(BookingError::MissingResource))
        );

        entry.resource_id = Some(room);
        assert_matches!(
            f.service.create_at(entry.clone(), &staff(), long_ago()).await,
            Err(AppError::Booking(BookingError::InsufficientDuration))
        );

        entry.duration_min = 60;
        assert!(f.service.create_at(entry, &staff(), long_ago()).await.is_ok());
    }

    #[tokio::test]
    async fn test_move_to_free_slot() {
        let f = fixture(60);
        let entry = f.service.create_at(entry_at(monday(), 10, 0, 30), &staff(), long_ago()).await.unwrap();
        let moved = f.service.move_entry_at(&entry.id, monday(), at(14, 0), &staff(), long_ago()).await.unwrap();
        assert_eq!(moved.time, at(14, 0));
    }

    #[tokio::test]
    async fn test_move_uncancels() {
        let f = fixture(60);
        let entry = f.service.create_at(entry_at(monday(), 10, 0, 30), &staff(), long_ago()).await.unwrap();
        f.service.set_status_at(&entry.id, StatusAction::Cancel, &staff(), long_ago()).await.unwrap();

        let moved = f.service.move_entry_at(&entry.id, monday(), at(11, 0), &staff(), long_ago()).await.unwrap();
        assert!(!moved.cancelled);
        assert!(!moved.no_show);
    }

    #[tokio::test]
    async fn test_move_snaps_after_short_blocker() {
        let f = fixture(60);
        let room = room(&f).await;

        let mut blocker = entry_at(monday(), 12, 0, 30);
        blocker.resource_id = Some(room.clone());
        f.service.create_at(blocker, &staff(), long_ago()).await.unwrap();

        let mut moving = entry_at(monday(), 9, 0, 30);
        moving.resource_id = Some(room);
        let moving = f.service.create_at(moving, &staff(), long_ago()).await.unwrap();

        let moved = f.service.move_entry_at(&moving.id, monday(), at(12, 0), &staff(), long_ago()).await.unwrap();
        assert_eq!(moved.time, at(12, 30));
        assert_eq!(f.entries.get(&moving.id).unwrap().time, at(12, 30));
    }

    #[tokio::test]
    async fn test_move_fails_when_blocker_fills_slot() {
        let f = fixture(60);
        let room = room(&f).await;

        let mut blocker = entry_at(monday(), 12, 0, 60);
        blocker.resource_id = Some(room.clone());
        f.service.create_at(blocker, &staff(), long_ago()).await.unwrap();

        let mut moving = entry_at(monday(), 9, 0, 30);
        moving.resource_id = Some(room);
        let moving = f.service.create_at(moving, &staff(), long_ago()).await.unwrap();

        assert_matches!(
            f.service.move_entry_at(&moving.id, monday(), at(12, 0), &staff(), long_ago()).await,
            Err(AppError::Booking(BookingError::ResourceConflict))
        );
        assert_eq!(f.entries.get(&moving.id).unwrap().time, at(9, 0));
    }

    #[tokio::test]
    async fn test_move_retry_failure_propagates() {
        let f = fixture(60);
        let room = room(&f).await;

        // 12:00-12:30 blocks the slot start, 12:30-13:30 blocks the retry position
        for (h, m, d) in [(12, 0, 30), (12, 30, 60)] {
            let mut e = entry_at(monday(), h, m, d);
            e.resource_id = Some(room.clone());
            f.service.create_at(e, &staff(), long_ago()).await.unwrap();
        }

        let mut moving = entry_at(monday(), 9, 0, 30);
        moving.resource_id = Some(room);
        let moving = f.service.create_at(moving, &staff(), long_ago()).await.unwrap();

        assert_matches!(
            f.service.move_entry_at(&moving.id, monday(), at(12, 0), &staff(), long_ago()).await,
            Err(AppError::Booking(BookingError::ResourceConflict))
        );
    }

    #[tokio::test]
    async fn test_move_without_blocker_in_slot_reraises() {
        let f = fixture(30);
        let room = room(&f).await;

        // starts before the target slot, so it is not a blocker
        let mut early = entry_at(monday(), 11, 30, 60);
        early.resource_id = Some(room.clone());
        f.service.create_at(early, &staff(), long_ago()).await.unwrap();

        let mut moving = entry_at(monday(), 9, 0, 30);
        moving.resource_id = Some(room);
        let moving = f.service.create_at(moving, &staff(), long_ago()).await.unwrap();

        assert_matches!(
            f.service.move_entry_at(&moving.id, monday(), at(12, 0), &staff(), long_ago()).await,
            Err(AppError::Booking(BookingError::ResourceConflict))
        );
    }

    #[tokio::test]
    async fn test_move_unknown_entry() {
        let f = fixture(60);
        assert_matches!(
            f.service.move_entry_at("nope", monday(), at(12, 0), &staff(), long_ago()).await,
            Err(AppError::NotFound(_))
        );
    }

    #[tokio::test]
    async fn test_move_field_error_is_not_retried() {
        let f = fixture(60);

        // short entry inside the target slot that would allow a retry at 12:15
        f.service.create_at(entry_at(monday(), 12, 0, 15), &staff(), long_ago()).await.unwrap();

        let mut moving = entry_at(monday(), 9, 0, 30);
        moving.notes = "x".repeat(2001);
        f.entries.insert(moving.clone());

        assert_matches!(
            f.service.move_entry_at(&moving.id, monday(), at(12, 0), &staff(), long_ago()).await,
            Err(AppError::Validation(_))
        );
        assert_eq!(f.entries.get(&moving.id).unwrap().time, at(9, 0));
    }

    #[tokio::test]
    async fn test_status_actions_are_exclusive() {
        let f = fixture(60);
        let entry = f.service.create_at(entry_at(monday(), 10, 0, 30), &staff(), long_ago()).await.unwrap();

        let cancelled = f.service.set_status_at(&entry.id, StatusAction::Cancel, &staff(), long_ago()).await.unwrap();
        assert!(cancelled.cancelled && !cancelled.no_show);

        let no_show = f.service.set_status_at(&entry.id, StatusAction::NoShow, &staff(), long_ago()).await.unwrap();
        assert!(!no_show.cancelled && no_show.no_show);
    }

    #[test]
    fn test_status_action_parse() {
        assert_eq!("cancel".parse::<StatusAction>().unwrap(), StatusAction::Cancel);
        assert_eq!("no_show".parse::<StatusAction>().unwrap(), StatusAction::NoShow);
        assert!("delete".parse::<StatusAction>().is_err());
    }

    #[tokio::test]
    async fn test_reminders_visibility() {
        let f = fixture(60);
        let now = monday().and_time(at(12, 0));

        let mut mine = entry_at(monday(), 15, 0, 30);
        mine.customer_id = Some("cust-1".into());
        f.entries.insert(mine.clone());

        let mut mine_cancelled = entry_at(monday() + Duration::days(1), 9, 0, 30);
        mine_cancelled.customer_id = Some("cust-1".into());
        mine_cancelled.cancelled = true;
        f.entries.insert(mine_cancelled);

        let mut earlier = entry_at(monday(), 9, 0, 30);
        earlier.customer_id = Some("cust-1".into());
        f.entries.insert(earlier);

        f.entries.insert(entry_at(monday() + Duration::days(1), 10, 0, 30));
        f.entries.insert(entry_at(monday() + Duration::days(2), 10, 0, 30));

        let customer_view = f.service.reminders_at(&non_staff(), now).await.unwrap();
        assert_eq!(customer_view.len(), 1);
        assert_eq!(customer_view[0].id, mine.id);

        let staff_view = f.service.reminders_at(&staff(), now).await.unwrap();
        assert_eq!(staff_view.len(), 3);
    }

    #[tokio::test]
    async fn test_cleanup_before() {
        let f = fixture(60);
        f.entries.insert(entry_at(monday() - Duration::days(400), 10, 0, 30));
        f.entries.insert(entry_at(monday(), 10, 0, 30));

        assert_eq!(f.service.cleanup_before(monday() - Duration::days(1)).await.unwrap(), 1);
        assert_eq!(f.entries.list_by_date(monday()).await.unwrap().len(), 1);
    }

    #[test]
    fn test_cleanup_cutoff() {
        let today = NaiveDate::from_ymd_opt(2030, 6, 15).unwrap();
        assert_eq!(cleanup_cutoff(today, 2, None).unwrap(), NaiveDate::from_ymd_opt(2028, 6, 15).unwrap());

        let before = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        assert_eq!(cleanup_cutoff(today, 0, Some(before)).unwrap(), before);
        assert_eq!(cleanup_cutoff(today, 3, Some(before)).unwrap(), NaiveDate::from_ymd_opt(2027, 6, 15).unwrap());

        assert!(cleanup_cutoff(today, 0, Some(today)).is_err());
        assert!(cleanup_cutoff(today, 0, None).is_err());

        assert_matches!(cleanup_cutoff(today, 2_147_483_648, None), Err(AppError::Validation(_)));
        assert_matches!(cleanup_cutoff(today, i32::MAX as u32, None), Err(AppError::Validation(_)));

        let leap_day = NaiveDate::from_ymd_opt(2028, 2, 29).unwrap();
        assert_eq!(cleanup_cutoff(leap_day, 1, None).unwrap(), NaiveDate::from_ymd_opt(2027, 2, 28).unwrap());
    }
}

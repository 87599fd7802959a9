//! In-memory repositories and fixtures for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use crate::domain::models::{
    customer::Customer,
    entry::{ConflictScope, Entry, NewEntryParams},
    resource::Resource,
    treatment::Treatment,
    user::Editor,
};
use crate::domain::ports::{CustomerRepository, EntryRepository, ResourceRepository, TreatmentRepository};
use crate::error::AppError;

pub fn entry_at(date: NaiveDate, hour: u32, minute: u32, duration_min: i32) -> Entry {
    Entry::new(NewEntryParams {
        date,
        time: NaiveTime::from_hms_opt(hour, minute, 0).unwrap(),
        duration_min: Some(duration_min),
        notes: None,
        customer_id: None,
        treatment_id: None,
        resource_id: None,
    })
}

pub fn staff() -> Editor {
    Editor { id: "staff-1".into(), username: "reception".into(), is_staff: true, customer_id: None }
}

pub fn non_staff() -> Editor {
    Editor { id: "cust-1".into(), username: "jdoe".into(), is_staff: false, customer_id: Some("cust-1".into()) }
}

fn sorted(mut entries: Vec<Entry>) -> Vec<Entry> {
    entries.sort_by_key(|e| (e.date, e.time));
    entries
}

#[derive(Default)]
pub struct MemoryEntryRepo {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryEntryRepo {
    /// Inserts or replaces an entry without validation.
    pub fn insert(&self, entry: Entry) {
        self.entries.lock().unwrap().insert(entry.id.clone(), entry);
    }

    pub fn get(&self, id: &str) -> Option<Entry> {
        self.entries.lock().unwrap().get(id).cloned()
    }

    fn filtered(&self, pred: impl Fn(&Entry) -> bool) -> Vec<Entry> {
        sorted(self.entries.lock().unwrap().values().filter(|e| pred(e)).cloned().collect())
    }
}

#[async_trait]
impl EntryRepository for MemoryEntryRepo {
    async fn create(&self, entry: &Entry) -> Result<Entry, AppError> {
        self.insert(entry.clone());
        Ok(entry.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Entry>, AppError> {
        Ok(self.get(id))
    }

    async fn update(&self, entry: &Entry) -> Result<Entry, AppError> {
        if self.get(&entry.id).is_none() {
            return Err(AppError::NotFound("Entry not found".into()));
        }
        self.insert(entry.clone());
        Ok(entry.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.entries.lock().unwrap().remove(id)
            .map(|_| ())
            .ok_or(AppError::NotFound("Entry not found".into()))
    }

    async fn find_active_in_scope(
        &self,
        date: NaiveDate,
        scope: ConflictScope<'_>,
        excluding_id: Option<&str>,
    ) -> Result<Vec<Entry>, AppError> {
        Ok(self.filtered(|e| {
            let in_scope = match scope {
                ConflictScope::Resource(id) => e.resource_id.as_deref() == Some(id),
                ConflictScope::Customer(id) => e.customer_id.as_deref() == Some(id),
            };
            e.date == date && in_scope && e.is_active() && Some(e.id.as_str()) != excluding_id
        }))
    }

    async fn find_next_active(
        &self,
        date: NaiveDate,
        from: NaiveTime,
        excluding_id: Option<&str>,
    ) -> Result<Option<Entry>, AppError> {
        Ok(self.filtered(|e| {
            e.date == date && e.time >= from && e.is_active() && Some(e.id.as_str()) != excluding_id
        }).into_iter().next())
    }

    async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Entry>, AppError> {
        Ok(self.filtered(|e| e.date == date))
    }

    async fn list_by_range(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Entry>, AppError> {
        Ok(self.filtered(|e| e.date >= from && e.date <= to))
    }

    async fn list_by_customer_until(&self, customer_id: &str, until: NaiveDate) -> Result<Vec<Entry>, AppError> {
        Ok(self.filtered(|e| e.customer_id.as_deref() == Some(customer_id) && e.date <= until))
    }

    async fn list_upcoming(
        &self,
        today: NaiveDate,
        now: NaiveTime,
        tomorrow: NaiveDate,
        customer_id: Option<&str>,
    ) -> Result<Vec<Entry>, AppError> {
        Ok(self.filtered(|e| {
            let upcoming = (e.date == today && e.time >= now) || e.date == tomorrow;
            let visible = match customer_id {
                Some(id) => e.customer_id.as_deref() == Some(id) && !e.cancelled,
                None => true,
            };
            upcoming && visible
        }))
    }

    async fn delete_before(&self, date: NaiveDate) -> Result<u64, AppError> {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|_, e| e.date >= date);
        Ok((before - entries.len()) as u64)
    }
}

#[derive(Default)]
pub struct MemoryTreatmentRepo {
    treatments: Mutex<HashMap<String, Treatment>>,
}

#[async_trait]
impl TreatmentRepository for MemoryTreatmentRepo {
    async fn create(&self, treatment: &Treatment) -> Result<Treatment, AppError> {
        self.treatments.lock().unwrap().insert(treatment.id.clone(), treatment.clone());
        Ok(treatment.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Treatment>, AppError> {
        Ok(self.treatments.lock().unwrap().get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Treatment>, AppError> {
        Ok(self.treatments.lock().unwrap().values().cloned().collect())
    }
}

#[derive(Default)]
pub struct MemoryResourceRepo {
    resources: Mutex<HashMap<String, Resource>>,
}

#[async_trait]
impl ResourceRepository for MemoryResourceRepo {
    async fn create(&self, resource: &Resource) -> Result<Resource, AppError> {
        self.resources.lock().unwrap().insert(resource.id.clone(), resource.clone());
        Ok(resource.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Resource>, AppError> {
        Ok(self.resources.lock().unwrap().get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Resource>, AppError> {
        Ok(self.resources.lock().unwrap().values().cloned().collect())
    }
}

#[derive(Default)]
pub struct MemoryCustomerRepo {
    customers: Mutex<HashMap<String, Customer>>,
}

#[async_trait]
impl CustomerRepository for MemoryCustomerRepo {
    async fn create(&self, customer: &Customer) -> Result<Customer, AppError> {
        self.customers.lock().unwrap().insert(customer.id.clone(), customer.clone());
        Ok(customer.clone())
    }

    async fn update(&self, customer: &Customer) -> Result<Customer, AppError> {
        let mut customers = self.customers.lock().unwrap();
        let stored = customers.get_mut(&customer.id)
            .ok_or(AppError::NotFound("Customer not found".into()))?;
        *stored = customer.clone();
        Ok(customer.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Customer>, AppError> {
        Ok(self.customers.lock().unwrap().get(id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Customer>, AppError> {
        Ok(self.customers.lock().unwrap().values().find(|c| c.username == username).cloned())
    }

    async fn list(&self) -> Result<Vec<Customer>, AppError> {
        Ok(self.customers.lock().unwrap().values().cloned().collect())
    }
}

use chrono::NaiveDate;
use serde::Serialize;
use crate::domain::models::{customer::Customer, entry::Entry};
use crate::domain::services::{slots::{SlotFlags, TimeSlot}, statistics::Statistics};

#[derive(Serialize)]
pub struct EntryView {
    #[serde(flatten)]
    pub entry: Entry,
    pub short: String,
}

#[derive(Serialize)]
pub struct DayListingResponse {
    pub date: NaiveDate,
    pub entries: Vec<EntryView>,
    pub statistics: Statistics,
}

#[derive(Serialize)]
pub struct SlotView {
    #[serde(flatten)]
    pub slot: TimeSlot,
    #[serde(flatten)]
    pub flags: SlotFlags,
}

#[derive(Serialize)]
pub struct DaySlotsResponse {
    pub date: NaiveDate,
    pub slots: Vec<SlotView>,
}

#[derive(Serialize)]
pub struct StatisticsResponse {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub statistics: Statistics,
}

#[derive(Serialize)]
pub struct CustomerView {
    #[serde(flatten)]
    pub customer: Customer,
    pub age: Option<i32>,
}

impl From<Customer> for CustomerView {
    fn from(customer: Customer) -> Self {
        let age = customer.age();
        Self { customer, age }
    }
}

#[derive(Serialize)]
pub struct CustomerHistoryResponse {
    pub customer: CustomerView,
    pub entries: Vec<EntryView>,
    pub statistics: Statistics,
}

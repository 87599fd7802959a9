pub mod customer;
pub mod diary;
pub mod entry;
pub mod health;
pub mod resource;
pub mod treatment;
pub mod user;

pub mod customer;
pub mod entry;
pub mod resource;
pub mod treatment;
pub mod user;

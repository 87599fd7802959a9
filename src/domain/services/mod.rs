pub mod credentials;
pub mod entry_service;
pub mod interval;
pub mod rules;
pub mod slots;
pub mod statistics;

#[cfg(test)]
pub(crate) mod test_support;

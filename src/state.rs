use std::sync::Arc;
use crate::domain::ports::{
    CustomerRepository, EntryRepository, ResourceRepository, TreatmentRepository, UserRepository,
};
use crate::domain::services::entry_service::EntryService;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub entry_repo: Arc<dyn EntryRepository>,
    pub resource_repo: Arc<dyn ResourceRepository>,
    pub treatment_repo: Arc<dyn TreatmentRepository>,
    pub customer_repo: Arc<dyn CustomerRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub entry_service: Arc<EntryService>,
}

impl AppState {
    pub fn new(
        config: Config,
        entry_repo: Arc<dyn EntryRepository>,
        resource_repo: Arc<dyn ResourceRepository>,
        treatment_repo: Arc<dyn TreatmentRepository>,
        customer_repo: Arc<dyn CustomerRepository>,
        user_repo: Arc<dyn UserRepository>,
    ) -> Self {
        let entry_service = Arc::new(EntryService::new(
            entry_repo.clone(),
            treatment_repo.clone(),
            resource_repo.clone(),
            customer_repo.clone(),
            config.diary.clone(),
        ));

        Self {
            config,
            entry_repo,
            resource_repo,
            treatment_repo,
            customer_repo,
            user_repo,
            entry_service,
        }
    }
}

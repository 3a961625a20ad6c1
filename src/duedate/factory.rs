use crate::calendar::factory::create_calendar_service;
use crate::core::domain::Configuration;
use crate::core::repository::RepositoryStore;
use crate::duedate::domain::DueDateService;
use crate::duedate::domain::service::DueDateServiceImpl;

pub(crate) async fn create_due_date_service(config: &Configuration, store: RepositoryStore) -> Box<dyn DueDateService> {
    let calendar_svc = create_calendar_service(config, store).await;
    Box::new(DueDateServiceImpl::new(config, calendar_svc))
}

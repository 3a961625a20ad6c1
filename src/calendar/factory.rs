use crate::calendar::domain::CalendarService;
use crate::calendar::domain::service::CalendarServiceImpl;
use crate::calendar::factory;
use crate::calendar::repository::CalendarRepository;
use crate::calendar::repository::ddb_calendar_repository::DDBCalendarRepository;
use crate::calendar::repository::memory_calendar_repository::MemoryCalendarRepository;
use crate::core::domain::Configuration;
use crate::core::repository::RepositoryStore;
use crate::utils::ddb::{build_db_client, create_table};

pub(crate) async fn create_calendar_repository(config: &Configuration, store: RepositoryStore) -> Box<dyn CalendarRepository> {
    let table_name = config.calendar_table.as_str();
    let index_name = format!("{}_ndx", table_name);
    match store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(store).await;
            Box::new(DDBCalendarRepository::new(client, table_name, index_name.as_str()))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(store).await;
            let _ = create_table(&client, table_name, "opening_day_id", "service_point_id", "opening_date").await;
            Box::new(DDBCalendarRepository::new(client, table_name, index_name.as_str()))
        }
        RepositoryStore::InMemory => {
            Box::new(MemoryCalendarRepository::shared())
        }
    }
}

pub(crate) async fn create_calendar_service(config: &Configuration, store: RepositoryStore) -> Box<dyn CalendarService> {
    let calendar_repo = factory::create_calendar_repository(config, store).await;
    Box::new(CalendarServiceImpl::new(calendar_repo))
}

use std::cmp;
use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{NaiveDate, Utc};
use tracing::debug;

use crate::calendar::domain::model::OpeningDayEntity;
use crate::calendar::dto::OpeningHours;
use crate::calendar::repository::CalendarRepository;
use crate::core::library::{LibraryError, LibraryResult, PaginatedResult};
use crate::core::repository::Repository;
use crate::utils::date::format_date;
use crate::utils::ddb::{add_filter_expr, from_ddb, hours_list, parse_bool_attribute, parse_date_attribute, parse_hours_attribute, parse_item, parse_number_attribute, parse_string_attribute, parse_timestamp_attribute, string_date, string_timestamp, to_ddb_page};

#[derive(Debug)]
pub(crate) struct DDBCalendarRepository {
    client: Client,
    table_name: String,
    index_name: String,
}

impl DDBCalendarRepository {
    pub(crate) fn new(client: Client, table_name: &str, index_name: &str) -> Self {
        Self {
            client,
            table_name: table_name.to_string(),
            index_name: index_name.to_string(),
        }
    }
}

#[async_trait]
impl Repository<OpeningDayEntity> for DDBCalendarRepository {
    async fn create(&self, entity: &OpeningDayEntity) -> LibraryResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        let mut item = parse_item(serde_json::to_value(entity)?)?;
        item.insert("hours".to_string(), hours_list(&to_pairs(&entity.hours)));
        self.client
            .put_item()
            .table_name(table_name)
            .condition_expression("attribute_not_exists(opening_day_id)")
            .set_item(Some(item))
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    async fn update(&self, entity: &OpeningDayEntity) -> LibraryResult<usize> {
        let table_name: &str = self.table_name.as_ref();

        self.client
            .update_item()
            .table_name(table_name)
            .key("opening_day_id", AttributeValue::S(entity.opening_day_id.clone()))
            .update_expression("SET version = :version, #open = :open, all_day = :all_day, hours = :hours, updated_at = :updated_at")
            .expression_attribute_names("#open", "open")
            .expression_attribute_values(":old_version", AttributeValue::N(entity.version.to_string()))
            .expression_attribute_values(":version", AttributeValue::N((entity.version + 1).to_string()))
            .expression_attribute_values(":open", AttributeValue::Bool(entity.open))
            .expression_attribute_values(":all_day", AttributeValue::Bool(entity.all_day))
            .expression_attribute_values(":hours", hours_list(&to_pairs(&entity.hours)))
            .expression_attribute_values(":updated_at", string_timestamp(Utc::now()))
            .condition_expression("attribute_exists(version) AND version = :old_version")
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    async fn get(&self, id: &str) -> LibraryResult<OpeningDayEntity> {
        let table_name: &str = self.table_name.as_ref();
        self.client
            .query()
            .table_name(table_name)
            .limit(2)
            .consistent_read(true)
            .key_condition_expression(
                "opening_day_id = :opening_day_id",
            )
            .expression_attribute_values(
                ":opening_day_id",
                AttributeValue::S(id.to_string()),
            )
            .send()
            .await.map_err(LibraryError::from).and_then(|req| {
            if let Some(items) = req.items {
                if items.len() > 1 {
                    return Err(LibraryError::database(format!("too many opening days for {}", id).as_str(), None, false));
                } else if let Some(map) = items.first() {
                    return Ok(OpeningDayEntity::from(map));
                }
            }
            Err(LibraryError::not_found(format!("opening day not found for {}", id).as_str()))
        })
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        let table_name: &str = self.table_name.as_ref();
        self.client.delete_item()
            .table_name(table_name)
            .key("opening_day_id", AttributeValue::S(id.to_string()))
            .send()
            .await.map(|_| 1).map_err(LibraryError::from)
    }

    // Note "open" and "date" are reserved words per https://docs.aws.amazon.com/amazondynamodb/latest/developerguide/ReservedWords.html
    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<OpeningDayEntity>> {
        let service_point_id = predicate.get("service_point_id").ok_or_else(|| LibraryError::validation(
            "opening days query requires service_point_id", Some("400".to_string())))?;
        let table_name: &str = self.table_name.as_ref();
        let index_name: &str = self.index_name.as_ref();
        let exclusive_start_key = to_ddb_page(page, predicate);
        let mut request = self.client
            .query()
            .table_name(table_name)
            .index_name(index_name)
            .limit(cmp::min(page_size, 500) as i32)
            .consistent_read(false)
            .set_exclusive_start_key(exclusive_start_key)
            .key_condition_expression("service_point_id = :service_point_id")
            .expression_attribute_values(":service_point_id", AttributeValue::S(service_point_id.to_string()));
        let mut filter_expr = String::new();
        for (k, v) in predicate {
            if k == "service_point_id" {
                continue;
            }
            if k == "open" || k == "all_day" {
                let ks = add_filter_expr(format!("#{}", k).as_str(), &mut filter_expr);
                request = request
                    .expression_attribute_names(ks.as_str(), k.as_str())
                    .expression_attribute_values(format!(":{}", &ks[1..]).as_str(), AttributeValue::Bool(v == "true"));
            } else {
                let ks = add_filter_expr(k.as_str(), &mut filter_expr);
                request = request.expression_attribute_values(format!(":{}", ks).as_str(), AttributeValue::S(v.to_string()));
            }
        }
        if !filter_expr.is_empty() {
            // placeholders for aliased names carry the alias prefix
            request = request.filter_expression(filter_expr.replace(":#", ":"));
        }
        request
            .send()
            .await.map_err(LibraryError::from).map(|req| {
            let records = req.items.as_ref().unwrap_or(&vec![]).iter()
                .map(OpeningDayEntity::from).collect();
            from_ddb(page, page_size, req.last_evaluated_key(), records)
        })
    }
}

#[async_trait]
impl CalendarRepository for DDBCalendarRepository {
    async fn find_by_service_point(&self, service_point_id: &str,
                                   from: NaiveDate, to: NaiveDate) -> LibraryResult<Vec<OpeningDayEntity>> {
        let table_name: &str = self.table_name.as_ref();
        let index_name: &str = self.index_name.as_ref();
        debug!("loading opening days of {} from {} to {}", service_point_id, format_date(from), format_date(to));
        self.client
            .query()
            .table_name(table_name)
            .index_name(index_name)
            .consistent_read(false)
            .key_condition_expression("service_point_id = :service_point_id AND opening_date BETWEEN :from AND :to")
            .expression_attribute_values(":service_point_id", AttributeValue::S(service_point_id.to_string()))
            .expression_attribute_values(":from", string_date(from))
            .expression_attribute_values(":to", string_date(to))
            .send()
            .await.map_err(LibraryError::from).map(|req| {
            let mut days: Vec<OpeningDayEntity> = req.items.as_ref().unwrap_or(&vec![]).iter()
                .map(OpeningDayEntity::from).collect();
            days.sort_by_key(|d| d.opening_date);
            days
        })
    }
}

fn to_pairs(hours: &[OpeningHours]) -> Vec<(chrono::NaiveTime, chrono::NaiveTime)> {
    hours.iter().map(|h| (h.start_time, h.end_time)).collect()
}

impl From<&HashMap<String, AttributeValue>> for OpeningDayEntity {
    fn from(map: &HashMap<String, AttributeValue>) -> Self {
        OpeningDayEntity {
            opening_day_id: parse_string_attribute("opening_day_id", map).unwrap_or_else(|| String::from("")),
            version: parse_number_attribute("version", map),
            service_point_id: parse_string_attribute("service_point_id", map).unwrap_or_else(|| String::from("")),
            opening_date: parse_date_attribute("opening_date", map).unwrap_or_default(),
            open: parse_bool_attribute("open", map),
            all_day: parse_bool_attribute("all_day", map),
            hours: parse_hours_attribute("hours", map).into_iter()
                .map(|(start, end)| OpeningHours::new(start, end)).collect(),
            created_at: parse_timestamp_attribute("created_at", map).unwrap_or_else(Utc::now),
            updated_at: parse_timestamp_attribute("updated_at", map).unwrap_or_else(Utc::now),
        }
    }
}

#[cfg(test)]
mod tests {
    use async_once::AsyncOnce;
    use aws_sdk_dynamodb::Client;
    use chrono::{NaiveDate, NaiveTime};
    use lazy_static::lazy_static;

    use crate::calendar::domain::model::OpeningDayEntity;
    use crate::calendar::dto::OpeningHours;
    use crate::calendar::repository::CalendarRepository;
    use crate::calendar::repository::ddb_calendar_repository::DDBCalendarRepository;
    use crate::core::repository::{Repository, RepositoryStore};
    use crate::utils::ddb::{build_db_client, create_table, delete_table};

    lazy_static! {
        static ref CLIENT: AsyncOnce<Client> = AsyncOnce::new(async {
                let client = build_db_client(RepositoryStore::LocalDynamoDB).await;
                let _ = delete_table(&client, "opening_days").await;
                let _ = create_table(&client, "opening_days", "opening_day_id", "service_point_id", "opening_date").await;
                client
            });
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, d).unwrap()
    }

    fn hours(start: u32, end: u32) -> OpeningHours {
        OpeningHours::new(NaiveTime::from_hms_opt(start, 0, 0).unwrap(), NaiveTime::from_hms_opt(end, 0, 0).unwrap())
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB Local on localhost:8000"]
    async fn test_should_create_get_opening_day() {
        let repo = DDBCalendarRepository::new(
            CLIENT.get().await.clone(), "opening_days", "opening_days_ndx");
        let opening_day = OpeningDayEntity::new("ddb-sp1", day(1), true, false, vec![hours(9, 17)]);
        let size = repo.create(&opening_day).await.expect("should create opening day");
        assert_eq!(1, size);

        let loaded = repo.get(opening_day.opening_day_id.as_str()).await.expect("should return opening day");
        assert_eq!(opening_day.opening_day_id, loaded.opening_day_id);
        assert_eq!(opening_day.hours, loaded.hours);
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB Local on localhost:8000"]
    async fn test_should_create_update_opening_day() {
        let repo = DDBCalendarRepository::new(
            CLIENT.get().await.clone(), "opening_days", "opening_days_ndx");
        let mut opening_day = OpeningDayEntity::new("ddb-sp2", day(2), true, false, vec![hours(9, 17)]);
        repo.create(&opening_day).await.expect("should create opening day");
        opening_day.hours = vec![hours(8, 12), hours(13, 18)];
        let size = repo.update(&opening_day).await.expect("should update opening day");
        assert_eq!(1, size);

        let loaded = repo.get(opening_day.opening_day_id.as_str()).await.expect("should return opening day");
        assert_eq!(2, loaded.hours.len());
        assert_eq!(1, loaded.version);
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB Local on localhost:8000"]
    async fn test_should_find_by_service_point() {
        let repo = DDBCalendarRepository::new(
            CLIENT.get().await.clone(), "opening_days", "opening_days_ndx");
        for d in 10..15 {
            repo.create(&OpeningDayEntity::new("ddb-sp3", day(d), true, true, vec![])).await.expect("should create");
        }
        let days = repo.find_by_service_point("ddb-sp3", day(11), day(13)).await.expect("should find");
        assert_eq!(3, days.len());
        assert_eq!(day(11), days[0].opening_date);
    }

    #[tokio::test]
    #[ignore = "requires DynamoDB Local on localhost:8000"]
    async fn test_should_create_delete_opening_day() {
        let repo = DDBCalendarRepository::new(
            CLIENT.get().await.clone(), "opening_days", "opening_days_ndx");
        let opening_day = OpeningDayEntity::new("ddb-sp4", day(20), false, false, vec![]);
        repo.create(&opening_day).await.expect("should create opening day");

        let deleted = repo.delete(opening_day.opening_day_id.as_str()).await.expect("should delete opening day");
        assert_eq!(1, deleted);
        assert!(repo.get(opening_day.opening_day_id.as_str()).await.is_err());
    }
}

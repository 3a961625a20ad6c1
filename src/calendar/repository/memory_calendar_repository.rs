use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use lazy_static::lazy_static;

use crate::calendar::domain::model::OpeningDayEntity;
use crate::calendar::repository::CalendarRepository;
use crate::core::domain::Identifiable;
use crate::core::library::{LibraryError, LibraryResult, PaginatedResult};
use crate::core::repository::Repository;
use crate::utils::date::parse_date;

type OpeningDayStore = Arc<RwLock<BTreeMap<String, OpeningDayEntity>>>;

lazy_static! {
    static ref SHARED_STORE: OpeningDayStore = Arc::new(RwLock::new(BTreeMap::new()));
}

// MemoryCalendarRepository keeps opening days in a process-wide map so that every
// service built per request sees the same calendar.
#[derive(Debug, Clone)]
pub(crate) struct MemoryCalendarRepository {
    store: OpeningDayStore,
}

impl MemoryCalendarRepository {
    pub(crate) fn shared() -> Self {
        Self {
            store: SHARED_STORE.clone(),
        }
    }

    #[cfg(test)]
    pub(crate) fn isolated() -> Self {
        Self {
            store: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    fn poisoned<T>(_err: T) -> LibraryError {
        LibraryError::runtime("opening day store lock poisoned", None)
    }
}

fn matches(entity: &OpeningDayEntity, predicate: &HashMap<String, String>) -> bool {
    predicate.iter().all(|(k, v)| match k.as_str() {
        "service_point_id" => entity.service_point_id == *v,
        "open" => entity.open.to_string() == *v,
        "all_day" => entity.all_day.to_string() == *v,
        "opening_date" => parse_date(v).map(|d| d == entity.opening_date).unwrap_or(false),
        "opening_date:>=" => parse_date(v).map(|d| entity.opening_date >= d).unwrap_or(false),
        "opening_date:<=" => parse_date(v).map(|d| entity.opening_date <= d).unwrap_or(false),
        _ => false,
    })
}

#[async_trait]
impl Repository<OpeningDayEntity> for MemoryCalendarRepository {
    async fn create(&self, entity: &OpeningDayEntity) -> LibraryResult<usize> {
        let mut store = self.store.write().map_err(Self::poisoned)?;
        if store.contains_key(entity.id().as_str()) {
            return Err(LibraryError::duplicate_key(
                format!("opening day {} already exists", entity.id()).as_str()));
        }
        store.insert(entity.id(), entity.clone());
        Ok(1)
    }

    async fn update(&self, entity: &OpeningDayEntity) -> LibraryResult<usize> {
        let mut store = self.store.write().map_err(Self::poisoned)?;
        match store.get_mut(entity.id().as_str()) {
            Some(existing) if existing.version == entity.version => {
                *existing = entity.clone();
                existing.version = entity.version + 1;
                existing.updated_at = Utc::now();
                Ok(1)
            }
            Some(existing) => Err(LibraryError::database(
                format!("opening day {} version {} does not match {}",
                        entity.id(), entity.version, existing.version).as_str(), None, false)),
            None => Err(LibraryError::not_found(
                format!("opening day not found for {}", entity.id()).as_str())),
        }
    }

    async fn get(&self, id: &str) -> LibraryResult<OpeningDayEntity> {
        let store = self.store.read().map_err(Self::poisoned)?;
        store.get(id).cloned().ok_or_else(|| LibraryError::not_found(
            format!("opening day not found for {}", id).as_str()))
    }

    async fn delete(&self, id: &str) -> LibraryResult<usize> {
        let mut store = self.store.write().map_err(Self::poisoned)?;
        Ok(store.remove(id).map(|_| 1).unwrap_or(0))
    }

    // pages are keyed by the last opening_day_id returned
    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<OpeningDayEntity>> {
        let store = self.store.read().map_err(Self::poisoned)?;
        let mut records: Vec<OpeningDayEntity> = store.values()
            .filter(|e| page.map(|p| e.opening_day_id.as_str() > p).unwrap_or(true))
            .filter(|e| matches(e, predicate))
            .take(page_size + 1)
            .cloned()
            .collect();
        let mut next_page = None;
        if records.len() > page_size {
            records.truncate(page_size);
            next_page = records.last().map(|e| e.opening_day_id.to_string());
        }
        Ok(PaginatedResult::new(page, page_size, next_page, records))
    }
}

#[async_trait]
impl CalendarRepository for MemoryCalendarRepository {
    async fn find_by_service_point(&self, service_point_id: &str,
                                   from: NaiveDate, to: NaiveDate) -> LibraryResult<Vec<OpeningDayEntity>> {
        let store = self.store.read().map_err(Self::poisoned)?;
        let mut days: Vec<OpeningDayEntity> = store.values()
            .filter(|e| e.service_point_id == service_point_id && e.opening_date >= from && e.opening_date <= to)
            .cloned()
            .collect();
        days.sort_by_key(|e| e.opening_date);
        Ok(days)
    }
}

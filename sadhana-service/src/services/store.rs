//! Persistence seams for accounts and sadhana reports.
//!
//! Handlers and services talk to these traits; production wires the Mongo
//! implementations from `database`, tests wire `MemoryStore`.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::models::{Role, SadhanaReport, User};
use crate::services::ServiceError;

/// Date scoping for report listings, already normalized: a single date has
/// displaced any range by the time a filter reaches a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFilter {
    Any,
    On(NaiveDate),
    Between(Option<NaiveDate>, Option<NaiveDate>),
}

impl DateFilter {
    pub fn matches(&self, date: NaiveDate) -> bool {
        match self {
            DateFilter::Any => true,
            DateFilter::On(d) => date == *d,
            DateFilter::Between(from, to) => {
                from.map_or(true, |f| date >= f) && to.map_or(true, |t| date <= t)
            }
        }
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ServiceError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, ServiceError>;
    /// Fails with `ServiceError::UserAlreadyExists` when the email is taken.
    async fn insert(&self, user: &User) -> Result<(), ServiceError>;
    /// Returns false when no account matched the id.
    async fn delete(&self, id: &str) -> Result<bool, ServiceError>;
    async fn list_all(&self) -> Result<Vec<User>, ServiceError>;
    async fn list_by_counselor(&self, counselor_id: &str) -> Result<Vec<User>, ServiceError>;
    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, ServiceError>;
    async fn health_check(&self) -> Result<(), ServiceError>;
}

#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn insert(&self, report: &SadhanaReport) -> Result<(), ServiceError>;
    /// One account's reports, newest date first.
    async fn list_for_user(
        &self,
        user_id: &str,
        filter: DateFilter,
    ) -> Result<Vec<SadhanaReport>, ServiceError>;
    /// Reports for a set of accounts (a counselor roster), capped at `limit`.
    async fn list_for_users(
        &self,
        user_ids: &[String],
        filter: DateFilter,
        limit: i64,
    ) -> Result<Vec<SadhanaReport>, ServiceError>;
    /// Global paginated listing plus the unpaginated total.
    async fn list_all(
        &self,
        filter: DateFilter,
        limit: i64,
        skip: u64,
    ) -> Result<(Vec<SadhanaReport>, u64), ServiceError>;
}

/// The store pair an `Application` is built around.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub reports: Arc<dyn ReportStore>,
}

/// In-memory store for tests. Implements both traits over shared maps,
/// mirroring the fallible surface of the Mongo stores.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, User>>,
    reports: RwLock<Vec<SadhanaReport>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sort_newest_first(reports: &mut [SadhanaReport]) {
    reports.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        let users = self.users.read().unwrap();
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, ServiceError> {
        let users = self.users.read().unwrap();
        Ok(users.get(id).cloned())
    }

    async fn insert(&self, user: &User) -> Result<(), ServiceError> {
        let mut users = self.users.write().unwrap();
        if users.values().any(|u| u.email == user.email) {
            return Err(ServiceError::UserAlreadyExists);
        }
        users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        let mut users = self.users.write().unwrap();
        Ok(users.remove(id).is_some())
    }

    async fn list_all(&self) -> Result<Vec<User>, ServiceError> {
        let users = self.users.read().unwrap();
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn list_by_counselor(&self, counselor_id: &str) -> Result<Vec<User>, ServiceError> {
        let users = self.users.read().unwrap();
        let mut roster: Vec<User> = users
            .values()
            .filter(|u| u.counselor.as_deref() == Some(counselor_id))
            .cloned()
            .collect();
        roster.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(roster)
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, ServiceError> {
        let users = self.users.read().unwrap();
        let mut matched: Vec<User> = users.values().filter(|u| u.role == role).cloned().collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matched)
    }

    async fn health_check(&self) -> Result<(), ServiceError> {
        Ok(())
    }
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn insert(&self, report: &SadhanaReport) -> Result<(), ServiceError> {
        self.reports.write().unwrap().push(report.clone());
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: &str,
        filter: DateFilter,
    ) -> Result<Vec<SadhanaReport>, ServiceError> {
        let reports = self.reports.read().unwrap();
        let mut matched: Vec<SadhanaReport> = reports
            .iter()
            .filter(|r| r.user_id == user_id && filter.matches(r.date))
            .cloned()
            .collect();
        sort_newest_first(&mut matched);
        Ok(matched)
    }

    async fn list_for_users(
        &self,
        user_ids: &[String],
        filter: DateFilter,
        limit: i64,
    ) -> Result<Vec<SadhanaReport>, ServiceError> {
        let reports = self.reports.read().unwrap();
        let mut matched: Vec<SadhanaReport> = reports
            .iter()
            .filter(|r| user_ids.contains(&r.user_id) && filter.matches(r.date))
            .cloned()
            .collect();
        sort_newest_first(&mut matched);
        matched.truncate(limit.max(0) as usize);
        Ok(matched)
    }

    async fn list_all(
        &self,
        filter: DateFilter,
        limit: i64,
        skip: u64,
    ) -> Result<(Vec<SadhanaReport>, u64), ServiceError> {
        let reports = self.reports.read().unwrap();
        let mut matched: Vec<SadhanaReport> = reports
            .iter()
            .filter(|r| filter.matches(r.date))
            .cloned()
            .collect();
        sort_newest_first(&mut matched);
        let total = matched.len() as u64;
        let page: Vec<SadhanaReport> = matched
            .into_iter()
            .skip(skip as usize)
            .take(limit.max(0) as usize)
            .collect();
        Ok((page, total))
    }
}

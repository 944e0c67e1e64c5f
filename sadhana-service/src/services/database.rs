use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    error::{ErrorKind, WriteFailure},
    options::{FindOptions, IndexOptions},
    Client as MongoClient, Collection, Database, IndexModel,
};

use crate::models::{Role, SadhanaReport, User};
use crate::services::{DateFilter, ReportStore, ServiceError, UserStore};

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, ServiceError> {
        tracing::info!(uri = %uri, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB at {}: {}", uri, e);
            ServiceError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), ServiceError> {
        tracing::info!("Creating MongoDB indexes for sadhana-service");

        // Unique index on email backs the duplicate-account check
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("email_unique".to_string())
                    .build(),
            )
            .build();
        self.users().create_index(email_index, None).await?;

        let counselor_index = IndexModel::builder()
            .keys(doc! { "counselor": 1 })
            .options(
                IndexOptions::builder()
                    .name("counselor_lookup".to_string())
                    .build(),
            )
            .build();
        self.users().create_index(counselor_index, None).await?;

        // Report listings sort by (date desc, created_at desc) per owner
        let owner_date_index = IndexModel::builder()
            .keys(doc! { "user_id": 1, "date": -1 })
            .options(
                IndexOptions::builder()
                    .name("owner_date_lookup".to_string())
                    .build(),
            )
            .build();
        self.reports().create_index(owner_date_index, None).await?;

        let created_index = IndexModel::builder()
            .keys(doc! { "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("created_at_desc".to_string())
                    .build(),
            )
            .build();
        self.reports().create_index(created_index, None).await?;

        Ok(())
    }

    pub fn users(&self) -> Collection<User> {
        self.db.collection("users")
    }

    pub fn reports(&self) -> Collection<SadhanaReport> {
        self.db.collection("sadhana_reports")
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(we)) if we.code == 11000
    )
}

fn date_filter_doc(filter: DateFilter) -> Option<Document> {
    match filter {
        DateFilter::Any => None,
        DateFilter::On(date) => Some(doc! { "date": date.to_string() }),
        DateFilter::Between(from, to) => {
            let mut range = Document::new();
            if let Some(from) = from {
                range.insert("$gte", from.to_string());
            }
            if let Some(to) = to {
                range.insert("$lte", to.to_string());
            }
            if range.is_empty() {
                None
            } else {
                Some(doc! { "date": range })
            }
        }
    }
}

fn report_sort() -> Document {
    doc! { "date": -1, "created_at": -1 }
}

#[async_trait]
impl UserStore for MongoDb {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        Ok(self.users().find_one(doc! { "email": email }, None).await?)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, ServiceError> {
        Ok(self.users().find_one(doc! { "_id": id }, None).await?)
    }

    async fn insert(&self, user: &User) -> Result<(), ServiceError> {
        self.users().insert_one(user, None).await.map_err(|e| {
            if is_duplicate_key(&e) {
                ServiceError::UserAlreadyExists
            } else {
                ServiceError::from(e)
            }
        })?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        let result = self.users().delete_one(doc! { "_id": id }, None).await?;
        Ok(result.deleted_count > 0)
    }

    async fn list_all(&self) -> Result<Vec<User>, ServiceError> {
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();
        let cursor = self.users().find(None, options).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn list_by_counselor(&self, counselor_id: &str) -> Result<Vec<User>, ServiceError> {
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();
        let cursor = self
            .users()
            .find(doc! { "counselor": counselor_id }, options)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, ServiceError> {
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();
        let cursor = self
            .users()
            .find(doc! { "role": role.as_str() }, options)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn health_check(&self) -> Result<(), ServiceError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ReportStore for MongoDb {
    async fn insert(&self, report: &SadhanaReport) -> Result<(), ServiceError> {
        self.reports().insert_one(report, None).await?;
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: &str,
        filter: DateFilter,
    ) -> Result<Vec<SadhanaReport>, ServiceError> {
        let mut query = doc! { "user_id": user_id };
        if let Some(date_doc) = date_filter_doc(filter) {
            query.extend(date_doc);
        }
        let options = FindOptions::builder().sort(report_sort()).build();
        let cursor = self.reports().find(query, options).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn list_for_users(
        &self,
        user_ids: &[String],
        filter: DateFilter,
        limit: i64,
    ) -> Result<Vec<SadhanaReport>, ServiceError> {
        let mut query = doc! { "user_id": { "$in": user_ids.to_vec() } };
        if let Some(date_doc) = date_filter_doc(filter) {
            query.extend(date_doc);
        }
        let options = FindOptions::builder()
            .sort(report_sort())
            .limit(limit)
            .build();
        let cursor = self.reports().find(query, options).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn list_all(
        &self,
        filter: DateFilter,
        limit: i64,
        skip: u64,
    ) -> Result<(Vec<SadhanaReport>, u64), ServiceError> {
        let query = date_filter_doc(filter).unwrap_or_default();

        let total = self
            .reports()
            .count_documents(query.clone(), None)
            .await?;

        let options = FindOptions::builder()
            .sort(report_sort())
            .limit(limit)
            .skip(skip)
            .build();
        let cursor = self.reports().find(query, options).await?;
        let reports = cursor.try_collect().await?;

        Ok((reports, total))
    }
}

//! Services layer: business logic and persistence seams.

mod auth;
mod database;
mod error;
mod jwt;
pub mod policy;
mod store;

pub use auth::AuthService;
pub use database::MongoDb;
pub use error::ServiceError;
pub use jwt::{Claims, JwtService};
pub use store::{DateFilter, MemoryStore, ReportStore, Stores, UserStore};

//! SeaORM entities for database tables
//!
//! Table and column names follow the shared relational schema (PascalCase
//! tables, camelCase columns) so the store can sit on an existing database.

pub mod account;
pub mod business_persona;
pub mod customer_persona;
pub mod post;
pub mod session;
pub mod user;
pub mod verification_token;

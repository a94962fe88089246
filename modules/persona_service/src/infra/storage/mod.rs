//! Storage layer - database entities and repositories

pub mod db;
pub mod entity;
pub mod mapper;
pub mod migrations;
pub mod repositories;

pub use db::connect;
pub use repositories::sea_orm_repositories;

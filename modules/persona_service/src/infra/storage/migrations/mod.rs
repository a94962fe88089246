//! Database migrations for persona service

use sea_orm_migration::prelude::*;

mod m20250101_000001_create_user;
mod m20250101_000002_create_auth_tables;
mod m20250101_000003_create_post;
mod m20250101_000004_create_personas;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_user::Migration),
            Box::new(m20250101_000002_create_auth_tables::Migration),
            Box::new(m20250101_000003_create_post::Migration),
            Box::new(m20250101_000004_create_personas::Migration),
        ]
    }
}

/// `User` table identifiers shared by the migrations that reference it
#[derive(DeriveIden)]
enum User {
    #[sea_orm(iden = "User")]
    Table,
    Id,
}

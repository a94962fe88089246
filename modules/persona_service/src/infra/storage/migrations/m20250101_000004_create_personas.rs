use super::User;
use sea_orm_migration::prelude::*;

/// Descriptive columns shared by both persona tables
const PROFILE_COLUMNS: [&str; 23] = [
    "age",
    "gender",
    "ethnicity",
    "income",
    "education",
    "religion",
    "profession",
    "personalityTraits",
    "hobbies",
    "lifeGoals",
    "values",
    "beliefs",
    "lifestyles",
    "country",
    "region",
    "city",
    "postalCode",
    "spendingHabits",
    "purchasingHabits",
    "browsingHabits",
    "brandInteractions",
    "brandLoyalty",
    "previousFeedback",
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut business = Table::create();
        business
            .table(BusinessPersona::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(BusinessPersona::Id)
                    .string()
                    .not_null()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(BusinessPersona::BusinessType)
                    .string()
                    .not_null(),
            );
        add_profile_and_audit_columns(&mut business, "BusinessPersona", BusinessPersona::Table);
        manager.create_table(business).await?;

        let mut customer = Table::create();
        customer.table(CustomerPersona::Table).if_not_exists().col(
            ColumnDef::new(CustomerPersona::Id)
                .string()
                .not_null()
                .primary_key(),
        );
        add_profile_and_audit_columns(&mut customer, "CustomerPersona", CustomerPersona::Table);
        manager.create_table(customer).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CustomerPersona::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BusinessPersona::Table).to_owned())
            .await
    }
}

/// Profile columns, timestamps and the nullable owner reference
fn add_profile_and_audit_columns(
    table: &mut TableCreateStatement,
    table_name: &str,
    table_iden: impl IntoIden + 'static,
) {
    for column in PROFILE_COLUMNS {
        table.col(ColumnDef::new(Alias::new(column)).string());
    }
    table
        .col(
            ColumnDef::new(Persona::CreatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(
            ColumnDef::new(Persona::UpdatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .col(ColumnDef::new(Persona::CreatedById).string())
        .foreign_key(
            ForeignKey::create()
                .name(format!("{table_name}_createdById_fkey"))
                .from(table_iden, Persona::CreatedById)
                .to(User::Table, User::Id)
                .on_delete(ForeignKeyAction::SetNull)
                .on_update(ForeignKeyAction::Cascade),
        );
}

#[derive(DeriveIden)]
enum BusinessPersona {
    #[sea_orm(iden = "BusinessPersona")]
    Table,
    Id,
    #[sea_orm(iden = "businessType")]
    BusinessType,
}

#[derive(DeriveIden)]
enum CustomerPersona {
    #[sea_orm(iden = "CustomerPersona")]
    Table,
    Id,
}

/// Columns common to both persona tables
#[derive(DeriveIden)]
enum Persona {
    #[sea_orm(iden = "createdAt")]
    CreatedAt,
    #[sea_orm(iden = "updatedAt")]
    UpdatedAt,
    #[sea_orm(iden = "createdById")]
    CreatedById,
}

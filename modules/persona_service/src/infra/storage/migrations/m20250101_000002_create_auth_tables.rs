use super::User;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Account::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Account::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Account::UserId).string().not_null())
                    .col(ColumnDef::new(Account::Type).string().not_null())
                    .col(ColumnDef::new(Account::Provider).string().not_null())
                    .col(ColumnDef::new(Account::ProviderAccountId).string().not_null())
                    .col(ColumnDef::new(Account::RefreshToken).text())
                    .col(ColumnDef::new(Account::AccessToken).text())
                    .col(ColumnDef::new(Account::ExpiresAt).integer())
                    .col(ColumnDef::new(Account::TokenType).string())
                    .col(ColumnDef::new(Account::Scope).string())
                    .col(ColumnDef::new(Account::IdToken).text())
                    .col(ColumnDef::new(Account::SessionState).string())
                    .col(ColumnDef::new(Account::RefreshTokenExpiresIn).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("Account_userId_fkey")
                            .from(Account::Table, Account::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("Account_provider_providerAccountId_key")
                    .table(Account::Table)
                    .col(Account::Provider)
                    .col(Account::ProviderAccountId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("Account_userId_idx")
                    .table(Account::Table)
                    .col(Account::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Session::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Session::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Session::SessionToken).string().not_null())
                    .col(ColumnDef::new(Session::UserId).string().not_null())
                    .col(
                        ColumnDef::new(Session::Expires)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("Session_userId_fkey")
                            .from(Session::Table, Session::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("Session_sessionToken_key")
                    .table(Session::Table)
                    .col(Session::SessionToken)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("Session_userId_idx")
                    .table(Session::Table)
                    .col(Session::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(VerificationToken::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VerificationToken::Identifier)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(VerificationToken::Token).string().not_null())
                    .col(
                        ColumnDef::new(VerificationToken::Expires)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(VerificationToken::Identifier)
                            .col(VerificationToken::Token),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("VerificationToken_token_key")
                    .table(VerificationToken::Table)
                    .col(VerificationToken::Token)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VerificationToken::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Session::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Account::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Account {
    #[sea_orm(iden = "Account")]
    Table,
    Id,
    #[sea_orm(iden = "userId")]
    UserId,
    Type,
    Provider,
    #[sea_orm(iden = "providerAccountId")]
    ProviderAccountId,
    RefreshToken,
    AccessToken,
    ExpiresAt,
    TokenType,
    Scope,
    IdToken,
    SessionState,
    RefreshTokenExpiresIn,
}

#[derive(DeriveIden)]
enum Session {
    #[sea_orm(iden = "Session")]
    Table,
    Id,
    #[sea_orm(iden = "sessionToken")]
    SessionToken,
    #[sea_orm(iden = "userId")]
    UserId,
    Expires,
}

#[derive(DeriveIden)]
enum VerificationToken {
    #[sea_orm(iden = "VerificationToken")]
    Table,
    Identifier,
    Token,
    Expires,
}

use sea_orm::entity::prelude::*;

/// Verification token table entity.
///
/// `token` holds the hash of the secret, never the plaintext.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "VerificationToken")]
pub struct Model {
    /// Part of composite primary key
    #[sea_orm(primary_key, auto_increment = false)]
    pub identifier: String,

    /// Part of composite primary key, also unique on its own
    #[sea_orm(primary_key, auto_increment = false)]
    pub token: String,

    pub expires: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

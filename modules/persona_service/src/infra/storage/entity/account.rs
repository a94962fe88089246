use sea_orm::entity::prelude::*;

/// Provider account table entity.
///
/// `(provider, providerAccountId)` is unique.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "Account")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(column_name = "userId")]
    pub user_id: String,

    /// Account kind (oauth, oidc, email, credentials, webauthn)
    pub r#type: String,

    pub provider: String,

    #[sea_orm(column_name = "providerAccountId")]
    pub provider_account_id: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub refresh_token: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub access_token: Option<String>,

    pub expires_at: Option<i32>,

    pub token_type: Option<String>,

    pub scope: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub id_token: Option<String>,

    pub session_state: Option<String>,

    pub refresh_token_expires_in: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

use sea_orm::entity::prelude::*;

/// User table entity
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "User")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: Option<String>,

    #[sea_orm(unique)]
    pub email: Option<String>,

    #[sea_orm(column_name = "emailVerified")]
    pub email_verified: Option<DateTimeUtc>,

    pub image: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::account::Entity")]
    Account,
    #[sea_orm(has_many = "super::session::Entity")]
    Session,
    #[sea_orm(has_many = "super::post::Entity")]
    Post,
    #[sea_orm(has_many = "super::business_persona::Entity")]
    BusinessPersona,
    #[sea_orm(has_many = "super::customer_persona::Entity")]
    CustomerPersona,
}

impl Related<super::account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl Related<super::business_persona::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BusinessPersona.def()
    }
}

impl Related<super::customer_persona::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CustomerPersona.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

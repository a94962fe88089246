use sea_orm::entity::prelude::*;

/// Customer persona table entity
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "CustomerPersona")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub age: Option<String>,
    pub gender: Option<String>,
    pub ethnicity: Option<String>,
    pub income: Option<String>,
    pub education: Option<String>,
    pub religion: Option<String>,
    pub profession: Option<String>,
    #[sea_orm(column_name = "personalityTraits")]
    pub personality_traits: Option<String>,
    pub hobbies: Option<String>,
    #[sea_orm(column_name = "lifeGoals")]
    pub life_goals: Option<String>,
    pub values: Option<String>,
    pub beliefs: Option<String>,
    pub lifestyles: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
    #[sea_orm(column_name = "postalCode")]
    pub postal_code: Option<String>,
    #[sea_orm(column_name = "spendingHabits")]
    pub spending_habits: Option<String>,
    #[sea_orm(column_name = "purchasingHabits")]
    pub purchasing_habits: Option<String>,
    #[sea_orm(column_name = "browsingHabits")]
    pub browsing_habits: Option<String>,
    #[sea_orm(column_name = "brandInteractions")]
    pub brand_interactions: Option<String>,
    #[sea_orm(column_name = "brandLoyalty")]
    pub brand_loyalty: Option<String>,
    #[sea_orm(column_name = "previousFeedback")]
    pub previous_feedback: Option<String>,

    #[sea_orm(column_name = "createdAt")]
    pub created_at: DateTimeUtc,

    #[sea_orm(column_name = "updatedAt")]
    pub updated_at: DateTimeUtc,

    /// Optional owner, nulled when the user is deleted
    #[sea_orm(column_name = "createdById")]
    pub created_by_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedById",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

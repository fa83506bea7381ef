use sea_orm::entity::prelude::*;

// Same shape as store reviews, aimed at a courier user instead of a store.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "courier_reviews")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub client_id: Uuid,
    pub courier_id: Uuid,
    pub rating: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ClientId",
        to = "super::users::Column::Id"
    )]
    Client,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CourierId",
        to = "super::users::Column::Id"
    )]
    Courier,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

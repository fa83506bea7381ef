use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "stores")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub name: String,
    pub image: String,
    pub category_id: Uuid,
    pub description: String,
    pub address: String,
    pub owner_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id"
    )]
    Categories,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Id"
    )]
    Owner,
    #[sea_orm(has_many = "super::products::Entity")]
    Products,
    #[sea_orm(has_many = "super::product_combos::Entity")]
    ProductCombos,
    #[sea_orm(has_many = "super::contact_infos::Entity")]
    ContactInfos,
    #[sea_orm(has_many = "super::store_reviews::Entity")]
    StoreReviews,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl Related<super::product_combos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductCombos.def()
    }
}

impl Related<super::contact_infos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ContactInfos.def()
    }
}

impl Related<super::store_reviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StoreReviews.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "inmates")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Composed "Last First M" form, capitalized parts joined by spaces
    pub name: String,

    pub age: i32,

    pub gender: String,

    pub nationality: String,

    /// One of the fixed security-level labels
    pub security_level: String,

    pub date_apprehended: Option<Date>,

    pub date_added: Date,

    /// Generated stored filename in the upload directory, not the
    /// original upload name
    pub evidence_file: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

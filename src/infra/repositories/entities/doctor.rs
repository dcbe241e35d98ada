//! Doctor profile database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::DoctorProfile;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "doctors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub specialization: String,
    pub experience: i32,
    pub fees_per_consultation: f64,
    pub department: String,
    pub bio: Option<String>,
    pub created_at: DateTimeUtc,
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
    #[sea_orm(has_many = "super::appointment::Entity")]
    Appointment,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::appointment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Appointment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for DoctorProfile {
    fn from(model: Model) -> Self {
        DoctorProfile {
            id: model.id,
            user_id: model.user_id,
            specialization: model.specialization,
            experience: model.experience,
            fees_per_consultation: model.fees_per_consultation,
            department: model.department,
            bio: model.bio,
            created_at: model.created_at,
        }
    }
}

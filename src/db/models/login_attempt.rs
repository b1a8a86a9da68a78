use crate::db::schema::login_attempts;
use chrono::{DateTime, Utc};
use diesel::{Insertable, Queryable, Selectable};
use uuid::Uuid;

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = login_attempts)]
pub struct NewLoginAttempt {
    pub user_id: Option<Uuid>,
    pub success: bool,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = login_attempts)]
pub struct LoginAttempt {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub success: bool,
    pub attempted_at: DateTime<Utc>,
}

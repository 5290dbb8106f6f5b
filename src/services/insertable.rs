use diesel::Insertable;
use serde::Serialize;

use crate::schema::dishes;
use crate::schema::users;

#[derive(Insertable, Serialize, Clone, Debug, PartialEq)]
#[diesel(table_name = users)]
pub struct NewStudent {
    pub student_id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub class: String,
}

#[derive(Insertable, Serialize, Clone, Debug, PartialEq)]
#[diesel(table_name = dishes)]
pub struct NewDish {
    pub name: String,
    pub description: String,
    pub ingredients: String,
    pub category: String,
    pub weight: String,
    pub price: f64,
    pub image_url: Option<String>,
}

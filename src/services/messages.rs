use actix::Message;
use diesel::QueryResult;

use crate::services::db_models::{Dish, Student};
use crate::services::insertable::{NewDish, NewStudent};

#[derive(Message)]
#[rtype(result = "QueryResult<Vec<Student>>")]
pub struct FetchStudents;

#[derive(Message)]
#[rtype(result = "QueryResult<Student>")]
pub struct CreateStudent(pub NewStudent);

/// Resolves to the number of deleted rows.
#[derive(Message)]
#[rtype(result = "QueryResult<usize>")]
pub struct DeleteStudent(pub i64);

#[derive(Message)]
#[rtype(result = "QueryResult<Vec<Dish>>")]
pub struct FetchDishes;

#[derive(Message)]
#[rtype(result = "QueryResult<Dish>")]
pub struct FetchDish(pub i64);

#[derive(Message)]
#[rtype(result = "QueryResult<Dish>")]
pub struct CreateDish(pub NewDish);

#[derive(Message)]
#[rtype(result = "QueryResult<usize>")]
pub struct DeleteDish(pub i64);

#[derive(Message)]
#[rtype(result = "QueryResult<Dish>")]
pub struct SetDishImage {
    pub dish_id: i64,
    pub file_name: String,
}

#[derive(Message)]
#[rtype(result = "QueryResult<()>")]
pub struct PingDatabase;

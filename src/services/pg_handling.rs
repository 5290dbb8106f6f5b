use actix::Handler;
use diesel::connection::SimpleConnection;
use diesel::{
    r2d2::{ConnectionManager, Pool, PooledConnection},
    result::{DatabaseErrorKind, Error},
    ExpressionMethods, PgConnection, QueryDsl, QueryResult, RunQueryDsl, SelectableHelper,
};
use tracing::{debug, warn};

use crate::services::db_models::{Dish, Student};
use crate::services::db_utils::PgActor;
use crate::services::messages::{
    CreateDish, CreateStudent, DeleteDish, DeleteStudent, FetchDish, FetchDishes, FetchStudents,
    PingDatabase, SetDishImage,
};

fn establish_connection(
    pool: &Pool<ConnectionManager<PgConnection>>,
) -> Result<PooledConnection<ConnectionManager<PgConnection>>, Error> {
    match pool.get() {
        Ok(val) => Ok(val),
        Err(err) => {
            warn!("Postgres pool exhausted or unreachable: {err}");
            Err(connection_err())
        }
    }
}

fn connection_err() -> Error {
    Error::DatabaseError(
        DatabaseErrorKind::ClosedConnection,
        Box::new("Failed to establish connection".to_owned()),
    )
}

impl Handler<FetchStudents> for PgActor {
    type Result = QueryResult<Vec<Student>>;

    fn handle(&mut self, _msg: FetchStudents, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::users::dsl::{class, last_name, users};

        let mut conn = establish_connection(&self.0)?;

        users
            .order((class.asc(), last_name.asc()))
            .select(Student::as_select())
            .load(&mut conn)
    }
}

impl Handler<CreateStudent> for PgActor {
    type Result = QueryResult<Student>;

    fn handle(&mut self, msg: CreateStudent, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::users::dsl::users;

        let mut conn = establish_connection(&self.0)?;

        let student = diesel::insert_into(users)
            .values(&msg.0)
            .returning(Student::as_returning())
            .get_result(&mut conn)?;

        debug!("Inserted student {} ({})", student.id, student.class);

        Ok(student)
    }
}

impl Handler<DeleteStudent> for PgActor {
    type Result = QueryResult<usize>;

    fn handle(&mut self, msg: DeleteStudent, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::users::dsl::users;

        let mut conn = establish_connection(&self.0)?;

        diesel::delete(users.find(msg.0)).execute(&mut conn)
    }
}

impl Handler<FetchDishes> for PgActor {
    type Result = QueryResult<Vec<Dish>>;

    fn handle(&mut self, _msg: FetchDishes, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::dishes::dsl::{category, dishes, name};

        let mut conn = establish_connection(&self.0)?;

        dishes
            .order((category.asc(), name.asc()))
            .select(Dish::as_select())
            .load(&mut conn)
    }
}

impl Handler<FetchDish> for PgActor {
    type Result = QueryResult<Dish>;

    fn handle(&mut self, msg: FetchDish, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::dishes::dsl::dishes;

        let mut conn = establish_connection(&self.0)?;

        dishes.find(msg.0).select(Dish::as_select()).first(&mut conn)
    }
}

impl Handler<CreateDish> for PgActor {
    type Result = QueryResult<Dish>;

    fn handle(&mut self, msg: CreateDish, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::dishes::dsl::dishes;

        let mut conn = establish_connection(&self.0)?;

        diesel::insert_into(dishes)
            .values(&msg.0)
            .returning(Dish::as_returning())
            .get_result(&mut conn)
    }
}

impl Handler<DeleteDish> for PgActor {
    type Result = QueryResult<usize>;

    fn handle(&mut self, msg: DeleteDish, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::dishes::dsl::dishes;

        let mut conn = establish_connection(&self.0)?;

        diesel::delete(dishes.find(msg.0)).execute(&mut conn)
    }
}

impl Handler<SetDishImage> for PgActor {
    type Result = QueryResult<Dish>;

    fn handle(&mut self, msg: SetDishImage, _ctx: &mut Self::Context) -> Self::Result {
        use crate::schema::dishes::dsl::{dishes, image};

        let mut conn = establish_connection(&self.0)?;

        diesel::update(dishes.find(msg.dish_id))
            .set(image.eq(Some(msg.file_name)))
            .returning(Dish::as_returning())
            .get_result(&mut conn)
    }
}

impl Handler<PingDatabase> for PgActor {
    type Result = QueryResult<()>;

    fn handle(&mut self, _msg: PingDatabase, _ctx: &mut Self::Context) -> Self::Result {
        let mut conn = establish_connection(&self.0)?;

        conn.batch_execute("SELECT 1")
    }
}

use actix_web::web::{self, Data, JsonConfig};
use actix_web::{get, HttpResponse, Responder};
use futures::future::join;
use serde_json::json;
use tracing::warn;

use crate::error::ServiceError;
use crate::services::db_models::{Dish, Student};
use crate::services::db_utils::AppState;
use crate::services::fallback::{fallback_dishes, fallback_students, MENU_OFFLINE_WARNING, ROSTER_OFFLINE_WARNING};
use crate::services::filters::{sort_menu, sort_roster};
use crate::services::messages::{FetchDish, FetchDishes, FetchStudents, PingDatabase};

pub mod auth;
pub mod cart;
pub mod cart_store;
pub mod db_models;
pub mod db_utils;
pub mod fallback;
pub mod filters;
pub mod insertable;
pub mod media;
pub mod messages;
pub mod orders;
pub mod pg_handling;
pub mod redis_handling;
pub mod validation;

/// Every route of the service, shared by `main` and the route tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        JsonConfig::default()
            .error_handler(|err, _req| ServiceError::Validation(format!("Malformed request body: {err}")).into()),
    )
    .service(home_page)
    .service(healthcheck)
    .service(
        web::scope("/api/users")
            .service(users_route::roster_stats)
            .service(users_route::list_students)
            .service(users_route::add_student)
            .service(users_route::delete_student),
    )
    .service(
        web::scope("/api/dishes")
            .service(dishes_route::menu_stats)
            .service(dishes_route::list_dishes)
            .service(dishes_route::get_dish)
            .service(dishes_route::add_dish)
            .service(dishes_route::delete_dish)
            .service(dishes_route::upload_image),
    )
    .service(web::scope("/api/files").service(dishes_route::serve_image))
    .service(
        web::scope("/cart")
            .service(cart_route::view_cart)
            .service(cart_route::add_to_cart)
            .service(cart_route::increase_line)
            .service(cart_route::decrease_line)
            .service(cart_route::remove_line)
            .service(cart_route::clear_cart)
            .service(cart_route::checkout),
    )
    .service(
        web::scope("/orders")
            .service(orders_route::list_orders)
            .service(orders_route::cancel_order)
            .service(orders_route::repeat_order),
    )
    .service(
        web::scope("/auth")
            .service(auth_route::login)
            .service(auth_route::profile)
            .service(auth_route::logout),
    );
}

#[get("/")]
pub async fn home_page() -> impl Responder {
    HttpResponse::Ok().body("School canteen service")
}

#[get("/health")]
pub async fn healthcheck(state: Data<AppState>) -> impl Responder {
    let (pg, redis_alive) = join(
        state.pg_db.send(PingDatabase),
        redis_handling::ping(&state.redis_db),
    )
    .await;

    HttpResponse::Ok().json(json!({
        "postgres": matches!(pg, Ok(Ok(()))),
        "redis": redis_alive,
    }))
}

/// Full roster, or the sample roster plus a warning when Postgres is down.
async fn roster_snapshot(state: &AppState) -> (Vec<Student>, Option<String>) {
    match state.pg_db.send(FetchStudents).await {
        Ok(Ok(mut students)) => {
            sort_roster(&mut students);
            (students, None)
        }
        Ok(Err(err)) => {
            warn!("Serving sample roster, students query failed: {err}");
            offline_roster()
        }
        Err(err) => {
            warn!("Serving sample roster, database actor unreachable: {err}");
            offline_roster()
        }
    }
}

fn offline_roster() -> (Vec<Student>, Option<String>) {
    let mut students = fallback_students();
    sort_roster(&mut students);
    (students, Some(ROSTER_OFFLINE_WARNING.into()))
}

async fn menu_snapshot(state: &AppState) -> (Vec<Dish>, Option<String>) {
    match state.pg_db.send(FetchDishes).await {
        Ok(Ok(mut dishes)) => {
            sort_menu(&mut dishes);
            (dishes, None)
        }
        Ok(Err(err)) => {
            warn!("Serving sample menu, dishes query failed: {err}");
            offline_menu()
        }
        Err(err) => {
            warn!("Serving sample menu, database actor unreachable: {err}");
            offline_menu()
        }
    }
}

fn offline_menu() -> (Vec<Dish>, Option<String>) {
    let mut dishes = fallback_dishes();
    sort_menu(&mut dishes);
    (dishes, Some(MENU_OFFLINE_WARNING.into()))
}

/// Looks a dish up for the cart. An outage falls back to the sample menu;
/// a dish that really is missing stays missing.
async fn find_dish(state: &AppState, dish_id: i64) -> Result<Dish, ServiceError> {
    let not_found = || ServiceError::NotFound(format!("Dish {dish_id}"));

    match state.pg_db.send(FetchDish(dish_id)).await {
        Ok(Ok(dish)) => Ok(dish),
        Ok(Err(diesel::result::Error::NotFound)) => Err(not_found()),
        Ok(Err(err)) => {
            warn!("Looking dish {dish_id} up in the sample menu: {err}");
            fallback_dishes().into_iter().find(|d| d.id == dish_id).ok_or_else(not_found)
        }
        Err(err) => {
            warn!("Looking dish {dish_id} up in the sample menu: {err}");
            fallback_dishes().into_iter().find(|d| d.id == dish_id).ok_or_else(not_found)
        }
    }
}

// sub-route "/api/users"
pub mod users_route {
    use actix_web::web::{Data, Json, Path, Query};
    use actix_web::{delete, get, post, HttpResponse, Responder};
    use serde_json::json;
    use tracing::info;

    use crate::error::ServiceError;
    use crate::services::auth::Principal;
    use crate::services::db_utils::AppState;
    use crate::services::filters::{Listing, RosterQuery, RosterStats};
    use crate::services::messages::{CreateStudent, DeleteStudent};
    use crate::services::validation::StudentForm;

    use super::roster_snapshot;

    #[get("")]
    pub async fn list_students(_principal: Principal, state: Data<AppState>, query: Query<RosterQuery>) -> impl Responder {
        let (students, warning) = roster_snapshot(&state).await;

        HttpResponse::Ok().json(Listing::roster(students, &query, warning))
    }

    #[get("/stats")]
    pub async fn roster_stats(_principal: Principal, state: Data<AppState>) -> impl Responder {
        let (students, warning) = roster_snapshot(&state).await;

        HttpResponse::Ok().json(RosterStats::new(&students, warning.is_none()))
    }

    #[post("")]
    pub async fn add_student(
        principal: Principal,
        state: Data<AppState>,
        body: Json<StudentForm>,
    ) -> Result<HttpResponse, ServiceError> {
        let new_student = body.into_inner().validate()?;

        let student = state
            .pg_db
            .send(CreateStudent(new_student))
            .await?
            .map_err(|err| match ServiceError::from(err) {
                ServiceError::Conflict(_) => ServiceError::Conflict("A student with this ID already exists".into()),
                other => other,
            })?;

        info!("{} added student {} {} to {}", principal.login, student.first_name, student.last_name, student.class);

        Ok(HttpResponse::Created().json(student))
    }

    #[delete("/{id}")]
    pub async fn delete_student(
        principal: Principal,
        state: Data<AppState>,
        path: Path<i64>,
    ) -> Result<HttpResponse, ServiceError> {
        let id = path.into_inner();

        match state.pg_db.send(DeleteStudent(id)).await?? {
            0 => Err(ServiceError::NotFound(format!("Student {id}"))),
            _ => {
                info!("{} deleted student {id}", principal.login);
                Ok(HttpResponse::Ok().json(json!({ "deleted": id })))
            }
        }
    }
}

// sub-routes "/api/dishes" and "/api/files"
pub mod dishes_route {
    use actix_web::web::{Bytes, Data, Json, Path, Query};
    use actix_web::{delete, get, post, put, HttpResponse, Responder};
    use serde_json::json;
    use tracing::{info, warn};

    use crate::error::ServiceError;
    use crate::services::auth::Principal;
    use crate::services::db_models::DishView;
    use crate::services::db_utils::AppState;
    use crate::services::filters::{category_stats, Listing, MenuQuery};
    use crate::services::media::{content_type_for, dish_media_dir, replace_image};
    use crate::services::messages::{CreateDish, DeleteDish, FetchDish, SetDishImage};
    use crate::services::validation::{validate_file_name, DishForm};

    use super::menu_snapshot;

    #[get("")]
    pub async fn list_dishes(_principal: Principal, state: Data<AppState>, query: Query<MenuQuery>) -> impl Responder {
        let (dishes, warning) = menu_snapshot(&state).await;

        HttpResponse::Ok().json(Listing::menu(dishes, &query, warning, &state.settings.files_base_url))
    }

    #[get("/stats")]
    pub async fn menu_stats(_principal: Principal, state: Data<AppState>) -> impl Responder {
        let (dishes, warning) = menu_snapshot(&state).await;

        HttpResponse::Ok().json(json!({
            "total": dishes.len(),
            "by_category": category_stats(&dishes),
            "connected": warning.is_none(),
        }))
    }

    #[get("/{id}")]
    pub async fn get_dish(
        _principal: Principal,
        state: Data<AppState>,
        path: Path<i64>,
    ) -> Result<HttpResponse, ServiceError> {
        let dish = state.pg_db.send(FetchDish(path.into_inner())).await??;

        Ok(HttpResponse::Ok().json(DishView::new(dish, &state.settings.files_base_url)))
    }

    #[post("")]
    pub async fn add_dish(
        principal: Principal,
        state: Data<AppState>,
        body: Json<DishForm>,
    ) -> Result<HttpResponse, ServiceError> {
        let new_dish = body.into_inner().validate()?;
        let dish = state.pg_db.send(CreateDish(new_dish)).await??;

        info!("{} added dish '{}' ({}, {})", principal.login, dish.name, dish.category, dish.price);

        Ok(HttpResponse::Created().json(DishView::new(dish, &state.settings.files_base_url)))
    }

    #[delete("/{id}")]
    pub async fn delete_dish(
        principal: Principal,
        state: Data<AppState>,
        path: Path<i64>,
    ) -> Result<HttpResponse, ServiceError> {
        let id = path.into_inner();

        if state.pg_db.send(DeleteDish(id)).await?? == 0 {
            return Err(ServiceError::NotFound(format!("Dish {id}")));
        }

        let dir = dish_media_dir(&state.settings.media_dir, id);
        if let Err(err) = tokio::fs::remove_dir_all(&dir).await {
            if err.kind() != std::io::ErrorKind::NotFound {
                warn!("Dish {id} deleted but its images at {} remain: {err}", dir.display());
            }
        }

        info!("{} deleted dish {id}", principal.login);

        Ok(HttpResponse::Ok().json(json!({ "deleted": id })))
    }

    #[put("/{id}/image/{file_name}")]
    pub async fn upload_image(
        principal: Principal,
        state: Data<AppState>,
        path: Path<(i64, String)>,
        body: Bytes,
    ) -> Result<HttpResponse, ServiceError> {
        let (dish_id, file_name) = path.into_inner();
        validate_file_name(&file_name)?;

        if body.is_empty() {
            return Err(ServiceError::Validation("Image body is empty".into()));
        }

        // 404 before anything touches the disk
        let previous = state.pg_db.send(FetchDish(dish_id)).await??.image;

        let dir = dish_media_dir(&state.settings.media_dir, dish_id);
        let pg_db = state.pg_db.clone();
        let update = SetDishImage { dish_id, file_name: file_name.clone() };
        let dish = replace_image(&dir, &file_name, previous.as_deref(), &body, move || async move {
            Ok::<_, ServiceError>(pg_db.send(update).await??)
        })
        .await?;
        info!("{} uploaded {} bytes of image for dish {dish_id}", principal.login, body.len());

        Ok(HttpResponse::Ok().json(DishView::new(dish, &state.settings.files_base_url)))
    }

    #[get("/dishes/{id}/{file_name}")]
    pub async fn serve_image(state: Data<AppState>, path: Path<(i64, String)>) -> Result<HttpResponse, ServiceError> {
        let (dish_id, file_name) = path.into_inner();
        validate_file_name(&file_name)?;

        let bytes = tokio::fs::read(dish_media_dir(&state.settings.media_dir, dish_id).join(&file_name)).await?;

        Ok(HttpResponse::Ok().content_type(content_type_for(&file_name)).body(bytes))
    }
}

// sub-route "/cart"
pub mod cart_route {
    use actix_web::web::{Data, Path};
    use actix_web::{delete, get, post, put, HttpResponse};
    use serde_json::json;
    use tracing::info;

    use crate::error::ServiceError;
    use crate::services::auth::CartOwner;
    use crate::services::cart::{Cart, CartLine, CartView};
    use crate::services::cart_store::{load_cart, owner_cart_key, reset_cart, store_cart};
    use crate::services::db_utils::AppState;

    use super::find_dish;

    /// Read, change and write back the owner's whole cart.
    pub(super) async fn update_cart<T>(
        state: &AppState,
        owner: &CartOwner,
        mutate: impl FnOnce(&mut Cart) -> Result<T, ServiceError>,
    ) -> Result<(T, Cart), ServiceError> {
        let key = owner_cart_key(&state.settings.cart_key, &owner.0);
        let _guard = state.cart_lock.lock().await;

        let mut cart = load_cart(state.cart_store.as_ref(), &key).await?;
        let outcome = mutate(&mut cart)?;
        store_cart(state.cart_store.as_ref(), &key, &cart).await?;

        Ok((outcome, cart))
    }

    fn missing_line(id: &str) -> ServiceError {
        ServiceError::NotFound(format!("Cart line {id}"))
    }

    #[get("")]
    pub async fn view_cart(owner: CartOwner, state: Data<AppState>) -> Result<HttpResponse, ServiceError> {
        let key = owner_cart_key(&state.settings.cart_key, &owner.0);
        let cart = load_cart(state.cart_store.as_ref(), &key).await?;

        Ok(HttpResponse::Ok().json(CartView::from(cart)))
    }

    #[post("/items/{dish_id}")]
    pub async fn add_to_cart(
        owner: CartOwner,
        state: Data<AppState>,
        path: Path<i64>,
    ) -> Result<HttpResponse, ServiceError> {
        let dish = find_dish(&state, path.into_inner()).await?;
        let line = CartLine::from_dish(&dish, &state.settings.files_base_url);

        let (quantity, cart) = update_cart(&state, &owner, |cart| Ok(cart.add(line, 1))).await?;

        Ok(HttpResponse::Ok().json(json!({
            "added": dish.name,
            "quantity": quantity,
            "cart": CartView::from(cart),
        })))
    }

    #[put("/items/{id}/increase")]
    pub async fn increase_line(
        owner: CartOwner,
        state: Data<AppState>,
        path: Path<String>,
    ) -> Result<HttpResponse, ServiceError> {
        let id = path.into_inner();
        let (_, cart) = update_cart(&state, &owner, |cart| cart.increase(&id).ok_or_else(|| missing_line(&id))).await?;

        Ok(HttpResponse::Ok().json(CartView::from(cart)))
    }

    #[put("/items/{id}/decrease")]
    pub async fn decrease_line(
        owner: CartOwner,
        state: Data<AppState>,
        path: Path<String>,
    ) -> Result<HttpResponse, ServiceError> {
        let id = path.into_inner();
        let (_, cart) = update_cart(&state, &owner, |cart| cart.decrease(&id).ok_or_else(|| missing_line(&id))).await?;

        Ok(HttpResponse::Ok().json(CartView::from(cart)))
    }

    #[delete("/items/{id}")]
    pub async fn remove_line(
        owner: CartOwner,
        state: Data<AppState>,
        path: Path<String>,
    ) -> Result<HttpResponse, ServiceError> {
        let id = path.into_inner();
        let (_, cart) = update_cart(&state, &owner, |cart| {
            if cart.remove(&id) {
                Ok(())
            } else {
                Err(missing_line(&id))
            }
        })
        .await?;

        Ok(HttpResponse::Ok().json(CartView::from(cart)))
    }

    /// Writes `[]` over whatever the key held, readable or not.
    #[delete("")]
    pub async fn clear_cart(owner: CartOwner, state: Data<AppState>) -> Result<HttpResponse, ServiceError> {
        let key = owner_cart_key(&state.settings.cart_key, &owner.0);
        let _guard = state.cart_lock.lock().await;

        reset_cart(state.cart_store.as_ref(), &key).await?;

        Ok(HttpResponse::Ok().json(CartView::from(Cart::default())))
    }

    /// Reports the total and empties the cart. No order is recorded.
    #[post("/checkout")]
    pub async fn checkout(owner: CartOwner, state: Data<AppState>) -> Result<HttpResponse, ServiceError> {
        let (receipt, _) = update_cart(&state, &owner, |cart| {
            if cart.is_empty() {
                return Err(ServiceError::Validation(
                    "The cart is empty, add dishes before placing an order".into(),
                ));
            }
            let receipt = CartView::from(cart.clone());
            cart.clear();
            Ok(receipt)
        })
        .await?;

        info!("Checked out {} cart lines for {}", receipt.count, receipt.total);

        Ok(HttpResponse::Ok().json(receipt))
    }
}

// sub-route "/orders"
pub mod orders_route {
    use actix_web::web::{Data, Path, Query};
    use actix_web::{get, post, HttpResponse};
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::MutexGuard;

    use crate::error::ServiceError;
    use crate::services::auth::CartOwner;
    use crate::services::cart::{CartLine, CartView};
    use crate::services::db_models::Dish;
    use crate::services::db_utils::AppState;
    use crate::services::orders::{OrderBook, OrderItem};

    use super::cart_route::update_cart;
    use super::menu_snapshot;

    #[derive(Deserialize)]
    pub struct StatusQuery {
        pub status: Option<String>,
    }

    fn order_book(state: &AppState) -> Result<MutexGuard<'_, OrderBook>, ServiceError> {
        state
            .order_book
            .lock()
            .map_err(|_| ServiceError::Internal("Order book lock poisoned".into()))
    }

    #[get("")]
    pub async fn list_orders(state: Data<AppState>, query: Query<StatusQuery>) -> Result<HttpResponse, ServiceError> {
        let orders = order_book(&state)?.list(query.status.as_deref())?;

        Ok(HttpResponse::Ok().json(orders))
    }

    #[post("/{id}/cancel")]
    pub async fn cancel_order(state: Data<AppState>, path: Path<u32>) -> Result<HttpResponse, ServiceError> {
        let order = order_book(&state)?.cancel(path.into_inner())?;

        Ok(HttpResponse::Ok().json(order))
    }

    /// Pairs each ordered item with the menu dish of the same name.
    /// Items the menu no longer offers come back in the second list.
    pub fn match_menu<'a>(items: &[OrderItem], menu: &'a [Dish]) -> (Vec<(&'a Dish, u32)>, Vec<String>) {
        let mut found = vec![];
        let mut missing = vec![];

        for item in items {
            match menu.iter().find(|dish| dish.name == item.name) {
                Some(dish) => found.push((dish, item.quantity)),
                None => missing.push(item.name.clone()),
            }
        }

        (found, missing)
    }

    /// Puts the items of a past order back into the cart, matched by dish name.
    #[post("/{id}/repeat")]
    pub async fn repeat_order(
        owner: CartOwner,
        state: Data<AppState>,
        path: Path<u32>,
    ) -> Result<HttpResponse, ServiceError> {
        let items = order_book(&state)?.get(path.into_inner())?.items.clone();
        let (menu, _) = menu_snapshot(&state).await;
        let (found, missing) = match_menu(&items, &menu);

        let base_url = &state.settings.files_base_url;
        let added: Vec<String> = found.iter().map(|(dish, _)| dish.name.clone()).collect();
        let (_, cart) = update_cart(&state, &owner, |cart| {
            for (dish, quantity) in &found {
                cart.add(CartLine::from_dish(dish, base_url), *quantity);
            }
            Ok(())
        })
        .await?;

        Ok(HttpResponse::Ok().json(json!({
            "added": added,
            "missing": missing,
            "cart": CartView::from(cart),
        })))
    }

}

// sub-route "/auth"
pub mod auth_route {
    use actix_web::web::{Data, Json};
    use actix_web::{get, post, HttpResponse};
    use serde_json::json;
    use tracing::info;

    use crate::error::ServiceError;
    use crate::services::auth::Principal;
    use crate::services::db_utils::AppState;
    use crate::services::redis_handling::{create_session, drop_session};
    use crate::services::validation::LoginForm;

    #[post("/login")]
    pub async fn login(state: Data<AppState>, body: Json<LoginForm>) -> Result<HttpResponse, ServiceError> {
        let login = body.into_inner().validate()?;
        let token = create_session(&state.redis_db, &login, state.settings.session_ttl_secs).await?;

        info!("{login} logged in");

        Ok(HttpResponse::Ok().json(json!({
            "login": login,
            "token": token,
            "expires_in": state.settings.session_ttl_secs,
        })))
    }

    #[get("/profile")]
    pub async fn profile(principal: Principal) -> HttpResponse {
        HttpResponse::Ok().json(principal)
    }

    #[post("/logout")]
    pub async fn logout(principal: Principal, state: Data<AppState>) -> Result<HttpResponse, ServiceError> {
        if let Some(token) = &principal.token {
            drop_session(&state.redis_db, token).await?;
        }

        Ok(HttpResponse::NoContent().finish())
    }
}

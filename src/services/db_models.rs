use chrono::NaiveDateTime;
use diesel::{Queryable, Selectable};
use serde::{Deserialize, Serialize};

#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Student {
    pub id: i64,
    pub student_id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub class: String,
    pub created: NaiveDateTime,
}

#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::dishes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Dish {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub ingredients: String,
    pub category: String,
    pub weight: String,
    pub price: f64,
    /// File name of an uploaded image, served from the media directory.
    pub image: Option<String>,
    pub image_url: Option<String>,
    pub created: NaiveDateTime,
}

impl Dish {
    /// Public link for the dish picture: an uploaded file wins over an external url.
    pub fn image_link(&self, files_base_url: &str) -> Option<String> {
        match (&self.image, &self.image_url) {
            (Some(file), _) if !file.is_empty() => Some(format!(
                "{}/api/files/dishes/{}/{}",
                files_base_url.trim_end_matches('/'),
                self.id,
                file
            )),
            (_, Some(url)) if !url.is_empty() => Some(url.clone()),
            _ => None,
        }
    }
}

/// Dish as handed out by the API, with its resolved picture link.
#[derive(Debug, Clone, Serialize)]
pub struct DishView {
    #[serde(flatten)]
    pub dish: Dish,
    pub image_link: Option<String>,
}

impl DishView {
    pub fn new(dish: Dish, files_base_url: &str) -> Self {
        let image_link = dish.image_link(files_base_url);
        Self { dish, image_link }
    }
}

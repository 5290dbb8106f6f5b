//! Fixed records handed out while Postgres is unreachable, so the roster and
//! the menu never come back empty.

use chrono::NaiveDateTime;

use crate::services::db_models::{Dish, Student};

pub const ROSTER_OFFLINE_WARNING: &str =
    "Cannot reach the database: check that Postgres is running and the \"users\" table exists. Showing sample students.";
pub const MENU_OFFLINE_WARNING: &str =
    "Cannot reach the database: check that Postgres is running and the \"dishes\" table exists. Showing the sample menu.";

fn student(id: i64, student_id: i64, first_name: &str, last_name: &str, class: &str) -> Student {
    Student {
        id,
        student_id: Some(student_id),
        first_name: first_name.into(),
        last_name: last_name.into(),
        class: class.into(),
        created: NaiveDateTime::default(),
    }
}

pub fn fallback_students() -> Vec<Student> {
    vec![
        student(1, 101, "Иван", "Петров", "5а"),
        student(2, 102, "Мария", "Сидорова", "5а"),
        student(3, 103, "Алексей", "Иванов", "6б"),
        student(4, 104, "Елена", "Кузнецова", "6б"),
    ]
}

#[allow(clippy::too_many_arguments)]
fn dish(id: i64, name: &str, description: &str, ingredients: &str, category: &str, weight: &str, price: f64, image_url: &str) -> Dish {
    Dish {
        id,
        name: name.into(),
        description: description.into(),
        ingredients: ingredients.into(),
        category: category.into(),
        weight: weight.into(),
        price,
        image: None,
        image_url: Some(image_url.into()),
        created: NaiveDateTime::default(),
    }
}

pub fn fallback_dishes() -> Vec<Dish> {
    vec![
        dish(
            1,
            "Суп картофельный с бобовыми",
            "Наваристый суп с горохом и зеленью",
            "Картофель, горох, лук, морковь, зелень, специи",
            "супы",
            "200 г",
            55.0,
            "https://main-cdn.sbermegamarket.ru/big1/hlr-system/156/312/944/111/623/27/100045246787b0.jpg",
        ),
        dish(
            2,
            "Салат из свежих помидор и огурцов",
            "Свежий овощной салат",
            "Помидоры, огурцы, лук, зелень, растительное масло, соль",
            "салаты",
            "100 г",
            65.0,
            "https://avatars.mds.yandex.net/i?id=929e6dd2bd2ca1cc8a5d29a62d62e6bfb4709a90-5255540-images-thumbs&n=13",
        ),
        dish(
            3,
            "Салат Цезарь",
            "Классический",
            "Куриное филе, салат романо, сухарики, пармезан, соус цезарь",
            "салаты",
            "120 г",
            80.0,
            "https://images-foodtech.magnit.ru/8g3vTR3-SR0-jFPIFjTLplegPoabO_JQbeHKoLXjZI8/rs:fit:1600:1600/plain/s3:/img-dostavka/uf/311/31144c68beed8ef8a6c9d03c33de791c/05f7d67d24f6f9d6b8c96e71cb5a84fd.jpeg@webp",
        ),
        dish(
            4,
            "Пирожное «Чоко пай»",
            "Шоколадное пирожное",
            "Бисквит, маршмеллоу, шоколадная глазурь",
            "десерты",
            "28 г",
            25.0,
            "https://coffeespace.ru/upload/iblock/cf9/jek2k039jp34ixryo6ibkgl1d28b7lsw.jpg",
        ),
    ]
}

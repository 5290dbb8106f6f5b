//! Form payloads accepted by the API and the checks that gate them before
//! anything reaches storage.

use serde::Deserialize;

use crate::error::ServiceError;
use crate::services::insertable::{NewDish, NewStudent};
use crate::types::{DishCategory, SchoolClass};

fn required(value: &str, prompt: &str) -> Result<String, ServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::Validation(prompt.to_owned()));
    }
    Ok(trimmed.to_owned())
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct StudentForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default = "default_class")]
    pub class: String,
    #[serde(default)]
    pub student_id: String,
}

fn default_class() -> String {
    SchoolClass::FifthA.as_str().to_owned()
}

impl StudentForm {
    pub fn validate(self) -> Result<NewStudent, ServiceError> {
        let first_name = required(&self.first_name, "Enter the student's first name")?;
        let last_name = required(&self.last_name, "Enter the student's last name")?;
        let raw_id = required(&self.student_id, "Enter the student's ID number")?;

        let student_id = raw_id
            .parse::<i64>()
            .map_err(|_| ServiceError::Validation("ID must be a number, for example 123".into()))?;

        let class = self
            .class
            .trim()
            .parse::<SchoolClass>()
            .map_err(|err| ServiceError::Validation(err.to_string()))?;

        Ok(NewStudent {
            student_id: Some(student_id),
            first_name,
            last_name,
            class: class.as_str().to_owned(),
        })
    }
}

/// Prices arrive either as JSON numbers or as the raw text of a form field.
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum PriceInput {
    Number(f64),
    Text(String),
}

impl Default for PriceInput {
    fn default() -> Self {
        PriceInput::Text(String::new())
    }
}

impl PriceInput {
    fn parse(&self) -> Result<f64, ServiceError> {
        let price = match self {
            PriceInput::Number(value) => *value,
            PriceInput::Text(text) => required(text, "Enter the price")?
                .replace(',', ".")
                .parse::<f64>()
                .map_err(|_| ServiceError::Validation("Price must be a number, for example 100".into()))?,
        };

        if !price.is_finite() || price < 0.0 {
            return Err(ServiceError::Validation("Price must be a non-negative number".into()));
        }
        Ok(price)
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct DishForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ingredients: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub weight: String,
    #[serde(default)]
    pub price: PriceInput,
    #[serde(default)]
    pub image_url: Option<String>,
}

fn default_category() -> String {
    DishCategory::Soups.as_str().to_owned()
}

impl DishForm {
    pub fn validate(self) -> Result<NewDish, ServiceError> {
        let name = required(&self.name, "Enter the dish name")?;
        let description = required(&self.description, "Enter the dish description")?;
        let ingredients = required(&self.ingredients, "Enter the dish ingredients")?;
        let weight = required(&self.weight, "Enter the portion weight")?;
        let price = self.price.parse()?;

        let category = self
            .category
            .trim()
            .parse::<DishCategory>()
            .map_err(|err| ServiceError::Validation(err.to_string()))?;

        let image_url = self
            .image_url
            .map(|url| url.trim().to_owned())
            .filter(|url| !url.is_empty());

        Ok(NewDish {
            name,
            description,
            ingredients,
            category: category.as_str().to_owned(),
            weight,
            price,
            image_url,
        })
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct LoginForm {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    /// Returns the trimmed login once both fields are filled in.
    pub fn validate(self) -> Result<String, ServiceError> {
        let login = self.login.trim();
        if login.is_empty() || self.password.is_empty() {
            return Err(ServiceError::Validation("Fill in all fields".into()));
        }
        Ok(login.to_owned())
    }
}

/// Names of uploaded images end up on disk; keep them to a flat, boring alphabet.
pub fn validate_file_name(file_name: &str) -> Result<&str, ServiceError> {
    let acceptable = !file_name.is_empty()
        && file_name.len() <= 100
        && !file_name.starts_with('.')
        && file_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));

    if acceptable {
        Ok(file_name)
    } else {
        Err(ServiceError::Validation(format!("Unacceptable file name '{file_name}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student_form() -> StudentForm {
        StudentForm {
            first_name: "Иван".into(),
            last_name: "Петров".into(),
            class: "5а".into(),
            student_id: "101".into(),
        }
    }

    fn dish_form() -> DishForm {
        DishForm {
            name: "Суп картофельный с бобовыми".into(),
            description: "Наваристый суп с горохом и зеленью".into(),
            ingredients: "Картофель, горох, лук, морковь".into(),
            category: "супы".into(),
            weight: "200 г".into(),
            price: PriceInput::Text("55".into()),
            image_url: Some("  ".into()),
        }
    }

    fn message(err: ServiceError) -> String {
        match err {
            ServiceError::Validation(msg) => msg,
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[test]
    fn empty_first_name_blocks_student() {
        let form = StudentForm { first_name: "   ".into(), ..student_form() };

        assert_eq!(message(form.validate().unwrap_err()), "Enter the student's first name");
    }

    #[test]
    fn student_checks_run_in_form_order() {
        let form = StudentForm { last_name: String::new(), student_id: String::new(), ..student_form() };
        assert_eq!(message(form.validate().unwrap_err()), "Enter the student's last name");

        let form = StudentForm { student_id: "12a".into(), ..student_form() };
        assert!(message(form.validate().unwrap_err()).starts_with("ID must be a number"));

        let form = StudentForm { class: "11".into(), ..student_form() };
        assert!(message(form.validate().unwrap_err()).contains("11"));
    }

    #[test]
    fn valid_student_is_trimmed() {
        let form = StudentForm { first_name: " Иван ".into(), ..student_form() };
        let student = form.validate().unwrap();

        assert_eq!(student.first_name, "Иван");
        assert_eq!(student.student_id, Some(101));
        assert_eq!(student.class, "5а");
    }

    #[test]
    fn student_form_defaults_class() {
        let form: StudentForm =
            serde_json::from_str(r#"{"first_name":"Мария","last_name":"Сидорова","student_id":"102"}"#).unwrap();

        assert_eq!(form.validate().unwrap().class, "5а");
    }

    #[test]
    fn dish_price_accepts_text_and_numbers() {
        assert_eq!(dish_form().validate().unwrap().price, 55.0);

        let form = DishForm { price: PriceInput::Text("12,5".into()), ..dish_form() };
        assert_eq!(form.validate().unwrap().price, 12.5);

        let form: DishForm = serde_json::from_value(serde_json::json!({
            "name": "Компот", "description": "Из сухофруктов", "ingredients": "Сухофрукты, вода",
            "category": "напитки", "weight": "200 мл", "price": 10
        }))
        .unwrap();
        assert_eq!(form.validate().unwrap().price, 10.0);
    }

    #[test]
    fn dish_rejects_bad_price_and_empty_fields() {
        let form = DishForm { price: PriceInput::Text("дёшево".into()), ..dish_form() };
        assert!(message(form.validate().unwrap_err()).starts_with("Price must be a number"));

        let form = DishForm { price: PriceInput::Number(-1.0), ..dish_form() };
        assert!(form.validate().is_err());

        let form = DishForm { weight: String::new(), ..dish_form() };
        assert_eq!(message(form.validate().unwrap_err()), "Enter the portion weight");
    }

    #[test]
    fn blank_image_url_is_dropped() {
        assert_eq!(dish_form().validate().unwrap().image_url, None);
    }

    #[test]
    fn login_requires_both_fields() {
        let form = LoginForm { login: "42".into(), password: String::new() };
        assert_eq!(message(form.validate().unwrap_err()), "Fill in all fields");

        let form = LoginForm { login: " 42 ".into(), password: "secret".into() };
        assert_eq!(form.validate().unwrap(), "42");
    }

    #[test]
    fn file_names_stay_flat() {
        assert!(validate_file_name("soup_01.jpg").is_ok());
        assert!(validate_file_name("../etc/passwd").is_err());
        assert!(validate_file_name(".hidden").is_err());
        assert!(validate_file_name("").is_err());
    }
}

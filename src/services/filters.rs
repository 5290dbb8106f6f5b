use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::services::db_models::{Dish, DishView, Student};
use crate::types::{DishCategory, SchoolClass, ALL_FILTER};

/// `None`, empty and `all` select everything; anything else is an exact match.
fn selects(filter: Option<&str>, value: &str) -> bool {
    match filter.map(str::trim) {
        None | Some("") | Some(ALL_FILTER) => true,
        Some(wanted) => wanted == value,
    }
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct RosterQuery {
    pub search: Option<String>,
    pub class: Option<String>,
}

impl RosterQuery {
    pub fn matches(&self, student: &Student) -> bool {
        let search = self.search.as_deref().unwrap_or("").trim().to_lowercase();

        let matches_search = search.is_empty()
            || contains_folded(&student.first_name, &search)
            || contains_folded(&student.last_name, &search)
            || student
                .student_id
                .is_some_and(|id| id.to_string().contains(&search));

        matches_search && selects(self.class.as_deref(), &student.class)
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct MenuQuery {
    pub search: Option<String>,
    pub category: Option<String>,
}

impl MenuQuery {
    pub fn matches(&self, dish: &Dish) -> bool {
        let search = self.search.as_deref().unwrap_or("").trim().to_lowercase();

        let matches_search = search.is_empty()
            || contains_folded(&dish.name, &search)
            || contains_folded(&dish.description, &search)
            || contains_folded(&dish.ingredients, &search);

        matches_search && selects(self.category.as_deref(), &dish.category)
    }
}

/// Known labels in their declared order, unknown ones after them.
fn by_label<T: FromStr + Ord>(a: &str, b: &str) -> Ordering {
    let rank = |label: &str| {
        let known = label.parse::<T>().ok();
        (known.is_none(), known)
    };

    rank(a).cmp(&rank(b)).then_with(|| a.cmp(b))
}

/// Class in school order (`5а` first, `10` last), then last name.
/// Applied to live and sample rosters alike.
pub fn sort_roster(students: &mut [Student]) {
    students.sort_by(|a, b| {
        by_label::<SchoolClass>(&a.class, &b.class)
            .then_with(|| a.last_name.cmp(&b.last_name))
            .then_with(|| a.first_name.cmp(&b.first_name))
    });
}

/// Category in menu order, then dish name.
pub fn sort_menu(dishes: &mut [Dish]) {
    dishes.sort_by(|a, b| by_label::<DishCategory>(&a.category, &b.category).then_with(|| a.name.cmp(&b.name)));
}

fn count_by<'a, T: 'a>(items: impl IntoIterator<Item = &'a T>, key: impl Fn(&T) -> &str) -> BTreeMap<String, usize> {
    let mut stats = BTreeMap::new();
    for item in items {
        let label = key(item);
        if !label.is_empty() {
            *stats.entry(label.to_owned()).or_insert(0) += 1;
        }
    }
    stats
}

pub fn class_stats(students: &[Student]) -> BTreeMap<String, usize> {
    count_by(students, |student| student.class.as_str())
}

pub fn category_stats(dishes: &[Dish]) -> BTreeMap<String, usize> {
    count_by(dishes, |dish| dish.category.as_str())
}

#[derive(Serialize, Debug)]
pub struct RosterStats {
    pub total: usize,
    pub with_student_id: usize,
    pub classes: usize,
    pub by_class: BTreeMap<String, usize>,
    pub connected: bool,
}

impl RosterStats {
    pub fn new(students: &[Student], connected: bool) -> Self {
        let by_class = class_stats(students);
        Self {
            total: students.len(),
            with_student_id: students.iter().filter(|s| s.student_id.is_some()).count(),
            classes: by_class.len(),
            by_class,
            connected,
        }
    }
}

/// A filtered page of records. `total` and `stats` describe the unfiltered set.
#[derive(Serialize, Debug)]
pub struct Listing<T> {
    pub connected: bool,
    pub warning: Option<String>,
    pub total: usize,
    pub stats: BTreeMap<String, usize>,
    pub items: Vec<T>,
}

impl Listing<Student> {
    pub fn roster(students: Vec<Student>, query: &RosterQuery, warning: Option<String>) -> Self {
        let stats = class_stats(&students);
        let total = students.len();
        let items = students.into_iter().filter(|s| query.matches(s)).collect();

        Self { connected: warning.is_none(), warning, total, stats, items }
    }
}

impl Listing<DishView> {
    pub fn menu(dishes: Vec<Dish>, query: &MenuQuery, warning: Option<String>, files_base_url: &str) -> Self {
        let stats = category_stats(&dishes);
        let total = dishes.len();
        let items = dishes
            .into_iter()
            .filter(|d| query.matches(d))
            .map(|d| DishView::new(d, files_base_url))
            .collect();

        Self { connected: warning.is_none(), warning, total, stats, items }
    }
}

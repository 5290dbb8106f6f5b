use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const SESSION_KEY_PREFIX: &str = "session";
pub const ALL_FILTER: &str = "all";

#[derive(Debug)]
pub struct UnknownVariant(pub String);

impl Display for UnknownVariant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

/// Grade and section a student belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SchoolClass {
    #[serde(rename = "5а")]
    FifthA,
    #[serde(rename = "5б")]
    FifthB,
    #[serde(rename = "5в")]
    FifthV,
    #[serde(rename = "6а")]
    SixthA,
    #[serde(rename = "6б")]
    SixthB,
    #[serde(rename = "6в")]
    SixthV,
    #[serde(rename = "7а")]
    SeventhA,
    #[serde(rename = "7б")]
    SeventhB,
    #[serde(rename = "7в")]
    SeventhV,
    #[serde(rename = "8а")]
    EighthA,
    #[serde(rename = "8б")]
    EighthB,
    #[serde(rename = "9а")]
    NinthA,
    #[serde(rename = "9б")]
    NinthB,
    #[serde(rename = "10")]
    Tenth,
}

impl SchoolClass {
    pub const ALL: [SchoolClass; 14] = [
        SchoolClass::FifthA,
        SchoolClass::FifthB,
        SchoolClass::FifthV,
        SchoolClass::SixthA,
        SchoolClass::SixthB,
        SchoolClass::SixthV,
        SchoolClass::SeventhA,
        SchoolClass::SeventhB,
        SchoolClass::SeventhV,
        SchoolClass::EighthA,
        SchoolClass::EighthB,
        SchoolClass::NinthA,
        SchoolClass::NinthB,
        SchoolClass::Tenth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SchoolClass::FifthA => "5а",
            SchoolClass::FifthB => "5б",
            SchoolClass::FifthV => "5в",
            SchoolClass::SixthA => "6а",
            SchoolClass::SixthB => "6б",
            SchoolClass::SixthV => "6в",
            SchoolClass::SeventhA => "7а",
            SchoolClass::SeventhB => "7б",
            SchoolClass::SeventhV => "7в",
            SchoolClass::EighthA => "8а",
            SchoolClass::EighthB => "8б",
            SchoolClass::NinthA => "9а",
            SchoolClass::NinthB => "9б",
            SchoolClass::Tenth => "10",
        }
    }
}

impl Display for SchoolClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for SchoolClass {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SchoolClass::ALL
            .into_iter()
            .find(|class| class.as_str() == s)
            .ok_or_else(|| UnknownVariant(format!("Unknown class '{s}'")))
    }
}

/// Menu sections, declared in the order the menu shows them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DishCategory {
    #[serde(rename = "супы")]
    Soups,
    #[serde(rename = "салаты")]
    Salads,
    #[serde(rename = "основные блюда")]
    Main,
    #[serde(rename = "гарниры")]
    Garnish,
    #[serde(rename = "десерты")]
    Desserts,
    #[serde(rename = "напитки")]
    Drinks,
}

impl DishCategory {
    pub const ALL: [DishCategory; 6] = [
        DishCategory::Soups,
        DishCategory::Salads,
        DishCategory::Main,
        DishCategory::Garnish,
        DishCategory::Desserts,
        DishCategory::Drinks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DishCategory::Soups => "супы",
            DishCategory::Salads => "салаты",
            DishCategory::Main => "основные блюда",
            DishCategory::Garnish => "гарниры",
            DishCategory::Desserts => "десерты",
            DishCategory::Drinks => "напитки",
        }
    }
}

impl Display for DishCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for DishCategory {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DishCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownVariant(format!("Unknown dish category '{s}'")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "выполнен")]
    Completed,
    #[serde(rename = "в обработке")]
    Processing,
    #[serde(rename = "отменен")]
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Completed => "выполнен",
            OrderStatus::Processing => "в обработке",
            OrderStatus::Cancelled => "отменен",
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [OrderStatus::Completed, OrderStatus::Processing, OrderStatus::Cancelled]
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownVariant(format!("Unknown order status '{s}'")))
    }
}

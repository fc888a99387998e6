//! Activity data types

use serde::{Deserialize, Serialize};

use super::session::Formula;

/// One pricing row: a customer category priced per formula
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    pub category: String,
    pub half_day: f64,
    pub full_day: f64,
}

/// Activity offered by the operator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub pricing: Vec<PriceRow>,
    pub min_participants: u32,
    pub max_participants: u32,
    pub min_age: u32,
    /// Free text, e.g. "3h"
    pub duration: String,
    /// Rich text
    #[serde(default)]
    pub required_equipment: String,
}

impl Activity {
    /// Unit price for a customer category under the given formula
    pub fn price_for(&self, category: &str, formula: Formula) -> Option<f64> {
        self.pricing
            .iter()
            .find(|row| row.category.eq_ignore_ascii_case(category))
            .map(|row| match formula {
                Formula::HalfDay => row.half_day,
                Formula::FullDay => row.full_day,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kayak() -> Activity {
        Activity {
            id: "a1".into(),
            name: "Kayak".into(),
            description: "Sea kayak tour".into(),
            pricing: vec![
                PriceRow {
                    category: "standard".into(),
                    half_day: 35.0,
                    full_day: 60.0,
                },
                PriceRow {
                    category: "reduced".into(),
                    half_day: 25.0,
                    full_day: 45.0,
                },
            ],
            min_participants: 2,
            max_participants: 10,
            min_age: 8,
            duration: "3h".into(),
            required_equipment: String::new(),
        }
    }

    #[test]
    fn test_price_for_category_and_formula() {
        let activity = kayak();
        assert_eq!(activity.price_for("standard", Formula::HalfDay), Some(35.0));
        assert_eq!(activity.price_for("Reduced", Formula::FullDay), Some(45.0));
        assert_eq!(activity.price_for("group", Formula::HalfDay), None);
    }
}

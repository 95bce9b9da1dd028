//! The family menu JSON as served by LinqConnect.
//!
//! Collections may be missing or `null` in the response, both read as empty.

use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MenuResponse {
    #[serde(default, deserialize_with = "nullable")]
    pub family_menu_sessions: Vec<Session>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Session {
    /// The meal period, like `Lunch` or `Breakfast`.
    #[serde(default)]
    pub serving_session: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub menu_plans: Vec<MenuPlan>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MenuPlan {
    #[serde(default)]
    pub menu_plan_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub days: Vec<Day>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Day {
    /// `MM/DD/YYYY`
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub menu_meals: Vec<Meal>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Meal {
    #[serde(default, deserialize_with = "nullable")]
    pub recipe_categories: Vec<RecipeCategory>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecipeCategory {
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub recipes: Vec<Recipe>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Recipe {
    #[serde(default)]
    pub recipe_name: Option<String>,
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

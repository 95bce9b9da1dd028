//! Fold the nested menu response into the main entrées of each day.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::{
    error::{Error, Result},
    menu::{Day, MenuResponse},
};

static DAY_FORMAT: &str = "%m/%d/%Y";

pub static DEFAULT_SERVING_SESSION: &str = "Lunch";
pub static DEFAULT_PLAN_NAME_PREFIX: &str = "Lunch";
pub static DEFAULT_CATEGORY_NAME: &str = "Main Entree";

/// Which parts of the menu are of interest.
///
/// Session and category names must match exactly, plan names only need to
/// start with the prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuFilter {
    pub serving_session: String,
    pub plan_name_prefix: String,
    pub category_name: String,
}

impl Default for MenuFilter {
    fn default() -> Self {
        MenuFilter {
            serving_session: String::from(DEFAULT_SERVING_SESSION),
            plan_name_prefix: String::from(DEFAULT_PLAN_NAME_PREFIX),
            category_name: String::from(DEFAULT_CATEGORY_NAME),
        }
    }
}

impl MenuFilter {
    pub fn with_plan_name_prefix(plan_name_prefix: &str) -> Self {
        MenuFilter {
            plan_name_prefix: String::from(plan_name_prefix),
            ..MenuFilter::default()
        }
    }

    fn matches_session(&self, serving_session: Option<&str>) -> bool {
        serving_session == Some(self.serving_session.as_str())
    }

    fn matches_plan(&self, menu_plan_name: Option<&str>) -> bool {
        menu_plan_name.is_some_and(|name| name.starts_with(&self.plan_name_prefix))
    }

    fn matches_category(&self, category_name: Option<&str>) -> bool {
        category_name == Some(self.category_name.as_str())
    }
}

/// The entrées of each day, in the order the days were encountered.
///
/// Repeated entrées within a day are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayEntrees {
    days: Vec<(NaiveDate, Vec<String>)>,
}

impl DayEntrees {
    /// Append entrées to a day, adding the day if it is not known yet.
    pub fn push(&mut self, date: NaiveDate, entrees: Vec<String>) {
        if entrees.is_empty() {
            return;
        }
        match self.days.iter_mut().find(|(known, _)| *known == date) {
            Some((_, known_entrees)) => known_entrees.extend(entrees),
            None => self.days.push((date, entrees)),
        }
    }

    pub fn get(&self, date: &NaiveDate) -> Option<&[String]> {
        self.days
            .iter()
            .find(|(known, _)| known == date)
            .map(|(_, entrees)| entrees.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &[String])> {
        self.days
            .iter()
            .map(|(date, entrees)| (date, entrees.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl FromIterator<(NaiveDate, Vec<String>)> for DayEntrees {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, Vec<String>)>>(iter: I) -> Self {
        let mut day_entrees = DayEntrees::default();
        for (date, entrees) in iter {
            day_entrees.push(date, entrees);
        }
        day_entrees
    }
}

/// Collect the entrées of all days matching the filter.
///
/// Days with an unreadable date are skipped, nothing in here aborts.
pub fn extract(menu: &MenuResponse, filter: &MenuFilter) -> DayEntrees {
    let mut day_entrees = DayEntrees::default();
    for session in &menu.family_menu_sessions {
        if !filter.matches_session(session.serving_session.as_deref()) {
            continue;
        }
        for menu_plan in &session.menu_plans {
            if !filter.matches_plan(menu_plan.menu_plan_name.as_deref()) {
                continue;
            }
            debug!(plan = ?menu_plan.menu_plan_name, "processing menu plan");
            for day in &menu_plan.days {
                let date = match parse_day_date(day) {
                    Ok(date) => date,
                    Err(err) => {
                        warn!("{err}, skipping day");
                        continue;
                    }
                };
                let entrees = day_entrees_of(day, filter);
                debug!(%date, entrees = ?entrees, "main entrees found");
                day_entrees.push(date, entrees);
            }
        }
    }
    day_entrees
}

fn parse_day_date(day: &Day) -> Result<NaiveDate> {
    let raw = day.date.as_deref().unwrap_or_default();
    NaiveDate::parse_from_str(raw, DAY_FORMAT).map_err(|_| Error::DayDate(String::from(raw)))
}

fn day_entrees_of(day: &Day, filter: &MenuFilter) -> Vec<String> {
    day.menu_meals
        .iter()
        .flat_map(|meal| &meal.recipe_categories)
        .filter(|category| filter.matches_category(category.category_name.as_deref()))
        .flat_map(|category| &category.recipes)
        .filter_map(|recipe| recipe.recipe_name.as_deref())
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::NaiveDate;

    use crate::{
        extract::{extract, DayEntrees, MenuFilter},
        menu::MenuResponse,
    };

    fn get_test_menu() -> MenuResponse {
        let json = include_str!("extract/tests/family_menu.json");
        serde_json::from_str(json).unwrap()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn test_extract_elementary() {
        let menu = get_test_menu();
        let day_entrees = extract(&menu, &MenuFilter::with_plan_name_prefix("Lunch- Elementary"));
        let expected: DayEntrees = [
            (
                NaiveDate::from_str("2025-08-21").unwrap(),
                strings(&["Pizza", "Salad"]),
            ),
            (
                NaiveDate::from_str("2025-08-22").unwrap(),
                strings(&["Tacos", "Tacos"]),
            ),
        ]
        .into_iter()
        .collect();
        assert_eq!(day_entrees, expected);
    }

    #[test]
    fn test_extract_all_lunch_plans() {
        let menu = get_test_menu();
        let day_entrees = extract(&menu, &MenuFilter::default());
        assert_eq!(day_entrees.len(), 2);
        assert_eq!(
            day_entrees.get(&NaiveDate::from_str("2025-08-21").unwrap()),
            Some(strings(&["Pizza", "Salad", "Burger"]).as_slice())
        );
    }

    #[test]
    fn test_extract_skips_unmatched_days() {
        let menu = get_test_menu();
        let day_entrees = extract(&menu, &MenuFilter::default());
        for date in ["2025-08-25", "2025-08-26", "2025-08-27"] {
            assert_eq!(day_entrees.get(&NaiveDate::from_str(date).unwrap()), None);
        }
    }

    #[test]
    fn test_extract_other_session() {
        let menu = get_test_menu();
        let filter = MenuFilter {
            serving_session: String::from("Breakfast"),
            plan_name_prefix: String::from("Breakfast"),
            category_name: String::from("Main Entree"),
        };
        let day_entrees = extract(&menu, &filter);
        let dates: Vec<_> = day_entrees.iter().map(|(date, _)| *date).collect();
        assert_eq!(dates, vec![NaiveDate::from_str("2025-08-21").unwrap()]);
    }

    #[test]
    fn test_extract_no_match() {
        let menu = get_test_menu();
        let day_entrees = extract(&menu, &MenuFilter::with_plan_name_prefix("Dinner"));
        assert!(day_entrees.is_empty());
        assert!(extract(&MenuResponse::default(), &MenuFilter::default()).is_empty());
    }

    #[test]
    fn test_extract_is_idempotent() {
        let menu = get_test_menu();
        let filter = MenuFilter::default();
        assert_eq!(extract(&menu, &filter), extract(&menu, &filter));
    }

    #[test]
    fn test_bad_date_does_not_stop_later_days() {
        let json = r#"{"FamilyMenuSessions": [{"ServingSession": "Lunch", "MenuPlans": [
            {"MenuPlanName": "Lunch", "Days": [
                {"Date": null, "MenuMeals": []},
                {"Date": "02/30/2025", "MenuMeals": []},
                {"Date": "09/02/2025", "MenuMeals": [{"RecipeCategories": [
                    {"CategoryName": "Main Entree", "Recipes": [{"RecipeName": "Chili"}]}
                ]}]}
            ]}
        ]}]}"#;
        let menu: MenuResponse = serde_json::from_str(json).unwrap();
        let day_entrees = extract(&menu, &MenuFilter::default());
        assert_eq!(day_entrees.len(), 1);
        assert_eq!(
            day_entrees.get(&NaiveDate::from_str("2025-09-02").unwrap()),
            Some(strings(&["Chili"]).as_slice())
        );
    }
}

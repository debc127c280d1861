// types.rs - Request and response contracts of the SmartFood service.
//
// These mirror the JSON bodies exchanged with the service. Field names are
// the wire names; nothing here carries behaviour beyond serde.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One selectable portion of a recognised food.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortionOption {
    pub id: u64,
    pub food_name: String,
    pub portion_name: String,
    pub weight_grams: f64,
    pub calories: f64,
    pub protein: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeImageRequest {
    pub image_base64: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeImageResponse {
    pub food_name: String,
    pub portion_options: Vec<PortionOption>,
    /// Whether the model was consulted (false when matched locally).
    #[serde(default)]
    pub ai_used: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRecordRequest {
    pub image_url: String,
    pub food_name: String,
    pub visual_portion_id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickRecordRequest {
    pub visual_portion_id: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealRecordResponse {
    pub id: u64,
    pub image_url: String,
    pub food_name: String,
    pub visual_portion_id: u64,
    pub calories: f64,
    pub protein: f64,
    pub record_date: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionItem {
    pub id: u64,
    pub food_name: String,
    pub portion_name: String,
    pub calories: f64,
    pub protein: f64,
    pub reason: String,
}

/// Today's consumption against the current targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBalanceResponse {
    pub remaining_calories: f64,
    pub remaining_protein: f64,
    pub consumed_calories: f64,
    pub consumed_protein: f64,
    pub target_calories: f64,
    pub target_protein: f64,
    pub meals_count: u32,
    #[serde(default)]
    pub suggestions: Vec<SuggestionItem>,
}

/// Window for progress statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressRange {
    Week,
    Month,
    #[default]
    All,
}

impl ProgressRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressRange::Week => "week",
            ProgressRange::Month => "month",
            ProgressRange::All => "all",
        }
    }
}

impl fmt::Display for ProgressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressDataPoint {
    pub date: NaiveDate,
    pub calorie_deficit: f64,
    pub consumed_calories: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressResponse {
    pub total_calorie_deficit: f64,
    pub estimated_fat_lost: f64,
    pub days_tracked: u32,
    pub data_points: Vec<ProgressDataPoint>,
    pub encouragement: String,
}

/// What the user enters when setting a goal. Targets are computed by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalInput {
    pub gender: String,
    pub age: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub deficit_target: i32,
}

/// The user's nutrition target as stored by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub gender: String,
    pub age: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub deficit_target: i32,
    pub calorie_target: f64,
    pub protein_target: f64,
}

impl GoalRecord {
    /// Whether the demographic inputs of this record match `input`.
    pub fn matches_input(&self, input: &GoalInput) -> bool {
        self.gender == input.gender
            && self.age == input.age
            && self.height_cm == input.height_cm
            && self.weight_kg == input.weight_kg
            && self.deficit_target == input.deficit_target
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub key: String,
    pub name: String,
    pub icon: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItemInfo {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub calories_per_100g: f64,
    pub protein_per_100g: f64,
    pub portion_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodCategoriesResponse {
    pub categories: Vec<CategoryInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodsByCategoryResponse {
    pub category: CategoryInfo,
    pub foods: Vec<FoodItemInfo>,
}

/// LAN addresses of the machine running the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalIpResponse {
    pub ips: Vec<String>,
    pub primary_ip: String,
    pub hostname: String,
    pub count: u32,
}

/// Static address file written next to the front end at deploy time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpConfig {
    pub ips: Vec<String>,
    pub primary_ip: String,
    pub hostname: String,
    pub port: u16,
    pub timestamp: i64,
}

/// Explanation the service attaches when it refuses a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recognized_food: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_used: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_foods: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goal_record_without_id_deserializes() {
        let json = r#"{"gender":"f","age":30,"height_cm":165,"weight_kg":60,
            "deficit_target":500,"calorie_target":1800,"protein_target":120}"#;
        let record: GoalRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, None);
        assert_eq!(record.calorie_target, 1800.0);
        assert!(!serde_json::to_string(&record).unwrap().contains("\"id\""));
    }

    #[test]
    fn goal_record_matches_its_input() {
        let input = GoalInput {
            gender: "f".into(),
            age: 30,
            height_cm: 165.0,
            weight_kg: 60.0,
            deficit_target: -500,
        };
        let mut record = GoalRecord {
            id: Some(1),
            gender: "f".into(),
            age: 30,
            height_cm: 165.0,
            weight_kg: 60.0,
            deficit_target: -500,
            calorie_target: 1600.0,
            protein_target: 96.0,
        };
        assert!(record.matches_input(&input));
        record.age = 31;
        assert!(!record.matches_input(&input));
    }

    #[test]
    fn progress_range_defaults_to_all() {
        assert_eq!(ProgressRange::default(), ProgressRange::All);
        assert_eq!(ProgressRange::Week.to_string(), "week");
        assert_eq!(
            serde_json::from_str::<ProgressRange>("\"month\"").unwrap(),
            ProgressRange::Month
        );
    }

    #[test]
    fn meal_record_parses_naive_timestamp() {
        let json = r#"{"id":3,"image_url":"","food_name":"rice","visual_portion_id":7,
            "calories":232.5,"protein":4.1,"record_date":"2025-03-01T12:30:05.123456"}"#;
        let record: MealRecordResponse = serde_json::from_str(json).unwrap();
        assert_eq!(record.record_date.date().to_string(), "2025-03-01");
    }

    #[test]
    fn rejection_detail_tolerates_missing_fields() {
        let detail: ApiErrorResponse =
            serde_json::from_str(r#"{"message":"no data","code":"FOOD_NOT_FOUND"}"#).unwrap();
        assert_eq!(detail.code.as_deref(), Some("FOOD_NOT_FOUND"));
        assert!(detail.available_foods.is_none());
    }
}

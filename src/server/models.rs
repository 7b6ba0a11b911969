use crate::language::{Difficulty, Language};
use crate::progress::ProgressMetrics;
use crate::stats::{AverageStatistics, BestPerformance, LastResult, TestResultRecord};
use crate::util::{lenient_f64, lenient_string};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

fn default_lang() -> String {
    "ru".to_string()
}

fn default_difficulty() -> String {
    "easy".to_string()
}

/// Query of `GET /text`
#[derive(Debug, Clone, Deserialize)]
pub struct TextQuery {
    #[serde(default = "default_lang")]
    pub lang: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextResponse {
    pub text: String,
    pub language: Language,
    pub difficulty: Difficulty,
}

/// Body of `POST /test-result` after lenient field coercion
#[derive(Debug, Clone, Validate)]
pub struct TestResultSubmission {
    pub user_id: Option<String>,

    #[validate(range(exclusive_min = 0.0, message = "chars_per_minute must be greater than 0"))]
    pub chars_per_minute: f64,

    #[validate(range(min = 0.0, max = 100.0, message = "accuracy must be between 0 and 100"))]
    pub accuracy: f64,

    #[validate(range(exclusive_min = 0.0, message = "time_seconds must be greater than 0"))]
    pub time_seconds: f64,

    pub language: String,
    pub difficulty: String,
}

impl TestResultSubmission {
    /// Accepts numbers or numeric strings (a trailing `%` is allowed).
    /// Unparsable or non-finite values become `0.0` and then fail validation.
    pub fn from_loose(body: &Map<String, Value>) -> Self {
        let number = |key: &str| {
            let value = lenient_f64(body.get(key), 0.0);
            if value.is_finite() {
                value
            } else {
                0.0
            }
        };
        let user_id = Some(lenient_string(body.get("user_id"))).filter(|id| !id.trim().is_empty());

        Self {
            user_id,
            chars_per_minute: number("chars_per_minute"),
            accuracy: number("accuracy"),
            time_seconds: number("time_seconds"),
            language: lenient_string(body.get("language")),
            difficulty: lenient_string(body.get("difficulty")),
        }
    }

    /// Language and difficulty a result may be stored under
    pub fn keys(&self) -> Result<(Language, Difficulty), String> {
        let language = self.language.parse::<Language>().map_err(|e| e.to_string())?;
        let difficulty = self
            .difficulty
            .parse::<Difficulty>()
            .map_err(|e| e.to_string())
            .and_then(|d| {
                if d.is_recordable() {
                    Ok(d)
                } else {
                    Err(format!(
                        "difficulty '{d}' cannot be recorded, allowed values: easy, medium, hard"
                    ))
                }
            })?;
        Ok((language, difficulty))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveResultResponse {
    pub user_id: String,
    pub test_result_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatisticsResponse {
    pub last_result: Option<LastResult>,
    pub best_performance: BestPerformance,
    pub avg_statistics: AverageStatistics,
    pub progress_metrics: ProgressMetrics,
    pub all_test_results: Vec<TestResultRecord>,
}

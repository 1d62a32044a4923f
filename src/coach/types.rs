use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Body of `POST /workout-plan`. The profile is a free-form JSON object; the
/// service decides which fields it cares about.
#[derive(Debug, Clone, Serialize)]
pub struct WorkoutPlanRequest {
    pub user_profile: serde_json::Value,
    pub goals: Vec<String>,
    pub available_equipment: Vec<String>,
    pub workout_duration: u32,
}

impl Default for WorkoutPlanRequest {
    fn default() -> Self {
        Self {
            user_profile: serde_json::json!({}),
            goals: vec!["general fitness".to_string()],
            available_equipment: vec!["bodyweight".to_string()],
            workout_duration: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct WorkoutPlan {
    pub exercise_name: String,
    pub sets: u32,
    pub reps: u32,
    /// Seconds, for time-based exercises.
    #[serde(default)]
    pub duration: Option<u32>,
    pub difficulty: String,
    pub instructions: String,
    pub target_muscles: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkoutPlanResponse {
    pub workout_plans: Vec<WorkoutPlan>,
    pub total_exercises: usize,
    pub estimated_duration: u32,
}

/// Body of `POST /nutrition-advice`.
#[derive(Debug, Clone, Serialize)]
pub struct NutritionAdviceRequest {
    pub user_profile: serde_json::Value,
    pub dietary_restrictions: Vec<String>,
    pub meal_type: String,
}

impl Default for NutritionAdviceRequest {
    fn default() -> Self {
        Self {
            user_profile: serde_json::json!({}),
            dietary_restrictions: vec![],
            meal_type: "general".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct NutritionAdvice {
    pub meal_type: String,
    pub food_items: Vec<String>,
    pub calories: u32,
    pub macronutrients: HashMap<String, f32>,
    pub timing: String,
    pub benefits: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NutritionAdviceResponse {
    pub nutrition_advice: Vec<NutritionAdvice>,
    pub meal_type: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ExerciseInfo {
    pub name: String,
    pub muscles: Vec<String>,
    pub difficulty: String,
    pub equipment: String,
    pub description: String,
    pub benefits: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExerciseLibrary {
    pub exercises: HashMap<String, ExerciseInfo>,
    pub total_exercises: usize,
}

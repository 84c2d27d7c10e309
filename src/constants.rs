// Runtime defaults, loaded from the environment (or .env) with fallbacks,
// plus the fixed interview script served by `naavi serve`.

use std::env;

lazy_static::lazy_static! {
    pub static ref NAAVI_URL: String = env::var("NAAVI_URL").unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());
    pub static ref NAAVI_PORT: u16 = env::var("NAAVI_PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(8000);
    pub static ref TEMPLATES_DIR: String = env::var("NAAVI_TEMPLATES_DIR").unwrap_or_else(|_| "templates".to_string());
    pub static ref STATIC_DIR: String = env::var("NAAVI_STATIC_DIR").unwrap_or_else(|_| "static".to_string());
    pub static ref OPENAI_API_KEY: String = env::var("OPENAI_API_KEY").unwrap_or_default();
    pub static ref OPENAI_BASE_URL: String = env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com".to_string());
    pub static ref ADVISOR_MODEL: String = env::var("NAAVI_MODEL").unwrap_or_else(|_| "gpt-4".to_string());
}

/// Endpoint every typed turn is posted to.
pub const CHAT_PATH: &str = "/process_chat";
/// Endpoint that turns the recorded answers into a roadmap.
pub const FINAL_OPTION_PATH: &str = "/process_final_option";

pub const INTRO_MESSAGE: &str =
    "Hi I am Naavi, your personal coach and navigator for higher education...😊";

pub const QUESTIONS: [&str; 3] = [
    "To gain further understanding, can you please describe your educational experience?",
    "What are your aspirations and higher education goals (e.g., want to study abroad or at elite universities)?",
    "Please describe if there are any financial constraints?",
];

pub const FINAL_OPTIONS: [&str; 4] = [
    "Would you like a detailed roadmap to achieve your career goals considering your academics, financial status, and study locations?",
    "Do you want personalized career guidance based on your academic performance, financial status, and desired study locations?",
    "Do you need other specific guidance like scholarship opportunities, study programs, or financial planning?",
    "Other",
];

pub const FINAL_PROMPT: &str = "Based on the information provided, generate three distinct pathways for achieving the user's educational and career goals. \
Each pathway should be clearly separated and include step-by-step guidance on academic focus, extracurricular activities, standardized tests, undergraduate education, gaining relevant experience, financial planning, residency, licensing, and additional tips. \
Each step should be detailed and easy to understand. Provide specific resources, examples, and tips to help the user along the way.";

pub const ADVISOR_MAX_TOKENS: u32 = 4096;
pub const ADVISOR_TEMPERATURE: f64 = 0.7;
pub const ADVISOR_TOP_P: f64 = 1.0;

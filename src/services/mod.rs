pub mod ai_parser;
pub mod ai_prompt;
pub mod comparison;
pub mod dashboard;
pub mod history;
pub mod summary;
pub mod suggestion;
pub mod volume;
pub mod workout_card;

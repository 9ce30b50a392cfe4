pub mod add;
pub mod dashboard;
pub mod import;
pub mod remove;
pub mod report;
pub mod search_by_category;

pub mod db;
pub mod employees;
pub mod migrations;
pub mod patterns;
pub mod schedules;
pub mod sessions;

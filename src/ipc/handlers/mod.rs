pub mod attendance;
pub mod calendar;
pub mod catalog;
pub mod core;
pub mod grades;
pub mod lessons;
pub mod planner;
pub mod reports;
pub mod schedule;
pub mod selection;

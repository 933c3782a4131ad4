pub mod azure;
pub mod backlog;
pub mod progress;
pub mod project;
pub mod report;
pub mod user;
pub mod work_item;

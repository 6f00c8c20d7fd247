pub mod assignments;
pub mod core;
pub mod dashboard;
pub mod submissions;
pub mod users;

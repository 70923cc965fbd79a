pub mod compositions;
pub mod purchases;
pub mod users;

pub mod assessment;
pub mod roadmap;
pub mod user;

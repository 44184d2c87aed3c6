pub mod factory;
pub mod request_repository;
pub mod response_rule_repository;

pub use factory::Repositories;

pub mod circulation;
pub mod domain;
pub mod events;
pub mod repository;

//! Repository implementations using SeaORM, plus in-memory fakes

pub mod memory;
pub mod result_repository;
pub mod user_repository;

pub use memory::{InMemoryResultRepository, InMemoryUserRepository};
pub use result_repository::SeaOrmResultRepository;
pub use user_repository::SeaOrmUserRepository;

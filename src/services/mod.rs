pub mod context;
pub mod health;
pub mod todo_service;

pub use context::ServiceContext;

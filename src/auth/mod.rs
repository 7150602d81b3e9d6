pub mod claims;
pub mod cookie;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod password;
pub mod repo;
pub mod token;

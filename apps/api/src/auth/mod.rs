//! Auth Service — registration, login and bearer-token verification.

pub mod handlers;
pub mod middleware;
pub mod password;
pub mod service;
pub mod token;

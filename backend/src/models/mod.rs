// src/models/mod.rs

pub mod comment;
pub mod magic_token;
pub mod pagination;
pub mod post;
pub mod user;

// src/handlers/mod.rs

pub mod hunt;
pub mod page;

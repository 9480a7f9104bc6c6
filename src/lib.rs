pub mod app;
pub mod config;
pub mod dto;
pub mod form;
pub mod handler;
pub mod model;
pub mod repository;
pub mod router;
pub mod service;
pub mod util;

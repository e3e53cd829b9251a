pub mod collector;
pub mod config;
pub mod demo;
pub mod models;
pub mod service;
pub mod syncthing_client;
pub mod types;
pub mod web;

//! HTTP handler modules for quire-api.

pub mod dashboards;
pub mod databases;
pub mod pages;
pub mod search;
pub mod system;

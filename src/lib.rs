//! Single-user health journal backend: daily wellbeing entries and
//! menstrual-cycle tracking over two local CSV tables, served to a form
//! frontend over a small local HTTP API.

pub mod config;
pub mod cycle;
pub mod entry;
pub mod models;
pub mod routes;
pub mod session;
pub mod store;

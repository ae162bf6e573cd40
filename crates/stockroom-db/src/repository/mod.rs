//! # Repository Module
//!
//! Single-statement database access for Stockroom, one repository per table.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.stocks().list_for_user(7)                                  │
//! │       ▼                                                                 │
//! │  StockRepository                                                       │
//! │  ├── create(&self, stock)                                              │
//! │  ├── list_for_user(&self, user_id)                                     │
//! │  └── list_expiring(&self, user_id, within_days)                        │
//! │       │                                                                 │
//! │       │  gateway::fetch_all_as(&pool, SQL, params)                     │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Anything that touches more than one row or table atomically lives in
//! [`crate::inventory`] instead, inside a transaction.
//!
//! ## Available Repositories
//!
//! - [`UserRepository`] - Signup and credential lookup
//! - [`ProductRepository`] - Product catalog per user
//! - [`StockRepository`] - Stock lots and the expiring-stock query
//! - [`SaleRepository`] - Sale history

pub mod product;
pub mod sale;
pub mod stock;
pub mod user;

pub use product::ProductRepository;
pub use sale::SaleRepository;
pub use stock::StockRepository;
pub use user::UserRepository;

//! Domain logic for the customer CRM backend.
//!
//! Everything in this crate is free of database and HTTP concerns:
//!
//! - [`customer`] -- customer status values, the insert payload, field rules.
//! - [`import`] -- the bulk spreadsheet import pipeline (intake, decoding,
//!   row validation, sequential persistence through a [`import::CustomerSink`]).
//! - [`pagination`] -- page/limit clamping shared by list endpoints.

pub mod customer;
pub mod error;
pub mod import;
pub mod pagination;
pub mod types;

//! Quote intake service
//!
//! Validates quote requests posted by the marketing site, stores them in
//! MySQL and answers with a localized (English/Arabic) JSON message.

pub mod config;
pub mod db;
pub mod i18n;
pub mod normalize;
pub mod quote;
pub mod server;
pub mod submission_log;
pub mod validation;

//! Discord interaction handlers
//!
//! Handlers for non-command interactions such as autocomplete.

/// Autocomplete handlers for member phones, customers, tiers and statuses
pub mod autocomplete;

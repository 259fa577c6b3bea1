//! Mosque Admin Common - Shared constants and utilities for the mosque admin client
//!
//! # Examples
//!
//! ```
//! use mosque_admin_common::{parse_hh_mm, truncate_string, PRAYER_CONFIG_ROOT};
//!
//! assert_eq!(PRAYER_CONFIG_ROOT, "prayer-config");
//! assert!(parse_hh_mm("06:00").is_ok());
//! assert_eq!(truncate_string("hello world", 5), "he...");
//! ```

pub mod constants;
pub mod utils;

pub use constants::*;
pub use utils::*;

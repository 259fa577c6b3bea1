//! Per-resource keys, read descriptors and write descriptors
//!
//! Every resource follows the same convention: keys start with the
//! resource's root, reads treat a missing data envelope as an error, and
//! every write invalidates its root when it settles.

pub mod calculation_methods;
pub mod events;
pub mod mosque;
pub mod prayer_config;
pub mod prayer_iqama;
pub mod prayer_times;
pub mod prayer_times_upload;

/// Whether an identifier is present; reads keyed by one stay disabled until it is
pub(crate) fn has_id(id: &str) -> bool {
    !id.trim().is_empty()
}

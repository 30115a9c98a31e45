//! Inquiry categories, statuses, limits, and the attachment value type.
//!
//! Statuses and categories are stored as `TEXT` columns; the constants here
//! are the only accepted spellings.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

/// Initial status for every new inquiry.
pub const STATUS_PENDING: &str = "pending";
/// An operator has written a reply.
pub const STATUS_ANSWERED: &str = "answered";
/// Resolved, with or without a written reply. Terminal.
pub const STATUS_CLOSED: &str = "closed";

/// All valid inquiry statuses, in lifecycle order.
pub const VALID_STATUSES: &[&str] = &[STATUS_PENDING, STATUS_ANSWERED, STATUS_CLOSED];

// ---------------------------------------------------------------------------
// Category constants
// ---------------------------------------------------------------------------

pub const CATEGORY_GENERAL: &str = "general";
pub const CATEGORY_SERVICE: &str = "service";
pub const CATEGORY_TECHNICAL_SUPPORT: &str = "technical-support";
pub const CATEGORY_PARTNERSHIP: &str = "partnership";
pub const CATEGORY_RECRUITING: &str = "recruiting";
pub const CATEGORY_OTHER: &str = "other";

/// All valid inquiry categories.
pub const VALID_CATEGORIES: &[&str] = &[
    CATEGORY_GENERAL,
    CATEGORY_SERVICE,
    CATEGORY_TECHNICAL_SUPPORT,
    CATEGORY_PARTNERSHIP,
    CATEGORY_RECRUITING,
    CATEGORY_OTHER,
];

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Maximum length of `content` at submission time, in characters.
pub const MAX_CONTENT_LENGTH: usize = 2000;

/// Minimum length of the access secret of a private inquiry.
pub const MIN_ACCESS_SECRET_LENGTH: usize = 4;

/// Maximum number of images attached to one inquiry.
pub const MAX_ATTACHMENTS: usize = 5;

/// Maximum size of a single attached image (5 MiB).
pub const MAX_ATTACHMENT_BYTES: u64 = 5 * 1024 * 1024;

/// Required prefix of an attachment's declared content type.
pub const ATTACHMENT_CONTENT_TYPE_PREFIX: &str = "image/";

// ---------------------------------------------------------------------------
// Attachments
// ---------------------------------------------------------------------------

/// One stored image attached to an inquiry.
///
/// Persisted as an element of the `attached_images` JSONB array, in
/// upload order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachedImage {
    /// Public download URL of the blob.
    pub url: String,
    /// Original file name as supplied by the submitter.
    pub file_name: String,
    /// Blob storage key, used for deletion.
    pub storage_key: String,
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

/// Validate that a status string is one of the known statuses.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::invalid_field(
            "status",
            format!("'{status}' is not a status. Must be one of: {VALID_STATUSES:?}"),
        ))
    }
}

/// Validate that a category string is one of the known categories.
pub fn validate_category(category: &str) -> Result<(), CoreError> {
    if VALID_CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(CoreError::invalid_field(
            "category",
            format!("'{category}' is not a category. Must be one of: {VALID_CATEGORIES:?}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_statuses_are_valid() {
        for s in VALID_STATUSES {
            assert!(validate_status(s).is_ok(), "Status '{s}' should be valid");
        }
    }

    #[test]
    fn unknown_status_is_invalid() {
        assert!(validate_status("reopened").is_err());
        assert!(validate_status("").is_err());
        assert!(validate_status("Pending").is_err());
    }

    #[test]
    fn all_categories_are_valid() {
        assert_eq!(VALID_CATEGORIES.len(), 6);
        for c in VALID_CATEGORIES {
            assert!(validate_category(c).is_ok(), "Category '{c}' should be valid");
        }
    }

    #[test]
    fn category_spelling_is_kebab_case() {
        assert!(validate_category("technical-support").is_ok());
        assert!(validate_category("technical_support").is_err());
        assert!(validate_category("technicalSupport").is_err());
    }

    #[test]
    fn attachment_limit_is_five_mebibytes() {
        assert_eq!(MAX_ATTACHMENT_BYTES, 5_242_880);
    }
}

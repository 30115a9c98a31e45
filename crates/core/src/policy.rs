//! Visibility and ownership rules for inquiries.
//!
//! Submitters are anonymous. Ownership of an inquiry is proven only by
//! knowing the email it was filed under and, for private inquiries, the
//! plaintext secret chosen at submission. This is a low-assurance check for
//! a public contact form and is kept separate from account authentication,
//! which is what operators use.

use crate::error::CoreError;
use crate::types::InquiryId;

/// Who is looking at an inquiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    /// Anyone without an operator account.
    Public,
    /// An authenticated account with the operator role.
    Operator,
}

/// The part of an inquiry the policy needs to decide on.
#[derive(Debug, Clone, Copy)]
pub struct Ownership<'a> {
    pub is_public: bool,
    pub author_email: &'a str,
    pub access_secret: Option<&'a str>,
}

/// Whether the record belongs in the public list.
pub fn is_publicly_listed(is_public: bool) -> bool {
    is_public
}

/// Whether `viewer` sees content, reply, and attachments of the record.
///
/// Public records are fully visible. Private ones need an operator or a
/// viewer who supplied the record's own secret (`unlocked`).
pub fn can_read_full(viewer: Viewer, is_public: bool, unlocked: bool) -> bool {
    is_public || unlocked || viewer == Viewer::Operator
}

/// Whether `viewer` sees the author's email, phone, and company.
///
/// Only operators and whoever just proved the record's secret. A public
/// record has no secret, so its contact details never reach the public.
pub fn can_read_contact(viewer: Viewer, unlocked: bool) -> bool {
    unlocked || viewer == Viewer::Operator
}

/// Exact, plaintext comparison of a stored secret against a supplied one.
///
/// A record without a secret never matches.
pub fn secret_matches(stored: Option<&str>, supplied: &str) -> bool {
    match stored {
        Some(stored) => !stored.is_empty() && stored == supplied,
        None => false,
    }
}

/// Whether a private record answers the targeted `(email, secret)` lookup.
///
/// Public records never match; both fields must match exactly.
pub fn matches_private_lookup(record: &Ownership<'_>, email: &str, secret: &str) -> bool {
    !record.is_public && record.author_email == email && secret_matches(record.access_secret, secret)
}

/// Unlock a private record for display by its secret alone.
pub fn unlock(record: &Ownership<'_>, secret: &str) -> Result<(), CoreError> {
    if record.is_public || secret_matches(record.access_secret, secret) {
        Ok(())
    } else {
        Err(CoreError::NoMatchingInquiry)
    }
}

/// Author verification performed before any edit or delete.
///
/// Private records need the email and the secret; public records carry no
/// secret, so the declared email is the only proof and any supplied secret
/// must be empty. Every failure is the same [`CoreError::NoMatchingInquiry`].
pub fn verify_author(
    record: &Ownership<'_>,
    email: &str,
    secret: Option<&str>,
) -> Result<(), CoreError> {
    if record.author_email != email {
        return Err(CoreError::NoMatchingInquiry);
    }
    let verified = if record.is_public {
        secret.is_none_or(str::is_empty)
    } else {
        secret.is_some_and(|s| secret_matches(record.access_secret, s))
    };
    if verified {
        Ok(())
    } else {
        Err(CoreError::NoMatchingInquiry)
    }
}

/// An author grant covers exactly one inquiry.
pub fn ensure_grant_covers(granted: InquiryId, target: InquiryId) -> Result<(), CoreError> {
    if granted == target {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Author verification is required for this inquiry".into(),
        ))
    }
}

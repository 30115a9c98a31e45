//! Submission validation for the wonders board.
//!
//! Every check is fail-fast: the first violated rule is reported as a
//! [`CoreError::InvalidField`] naming the offending field, and nothing is
//! sent to the store.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;
use crate::inquiry::{
    validate_category, ATTACHMENT_CONTENT_TYPE_PREFIX, MAX_ATTACHMENTS, MAX_ATTACHMENT_BYTES,
    MAX_CONTENT_LENGTH, MIN_ACCESS_SECRET_LENGTH,
};

/// Basic email shape: something, `@`, something, `.`, something, no spaces.
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("valid regex"));

/// Borrowed view of the text fields of a new inquiry.
#[derive(Debug, Clone, Copy)]
pub struct Submission<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub category: &'a str,
    pub author_name: &'a str,
    pub author_email: &'a str,
    pub is_public: bool,
    pub access_secret: Option<&'a str>,
}

/// An image the submitter wants to attach, described before upload.
#[derive(Debug, Clone, Copy)]
pub struct AttachmentCandidate<'a> {
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub size_bytes: u64,
}

/// Validate a complete submission, fields first, then attachments.
pub fn validate_submission(
    submission: &Submission<'_>,
    attachments: &[AttachmentCandidate<'_>],
) -> Result<(), CoreError> {
    validate_title(submission.title)?;
    validate_content(submission.content)?;
    validate_author_name(submission.author_name)?;
    validate_email(submission.author_email)?;
    validate_category(submission.category)?;
    validate_access_secret(submission.is_public, submission.access_secret)?;
    validate_attachments(attachments)
}

/// Validate the fields an author may change after submission.
pub fn validate_edit(title: &str, content: &str) -> Result<(), CoreError> {
    validate_title(title)?;
    validate_content(content)
}

/// An operator reply must contain something other than whitespace.
pub fn validate_reply(reply: &str) -> Result<(), CoreError> {
    if reply.trim().is_empty() {
        return Err(CoreError::invalid_field("admin_reply", "Reply must not be empty"));
    }
    Ok(())
}

pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::invalid_field("title", "Title is required"));
    }
    Ok(())
}

/// Content is required and limited to [`MAX_CONTENT_LENGTH`] characters
/// (Unicode scalar values, not bytes).
pub fn validate_content(content: &str) -> Result<(), CoreError> {
    if content.trim().is_empty() {
        return Err(CoreError::invalid_field("content", "Content is required"));
    }
    let len = content.chars().count();
    if len > MAX_CONTENT_LENGTH {
        return Err(CoreError::invalid_field(
            "content",
            format!("Content exceeds maximum length of {MAX_CONTENT_LENGTH} characters (got {len})"),
        ));
    }
    Ok(())
}

pub fn validate_author_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::invalid_field("author_name", "Name is required"));
    }
    Ok(())
}

/// Loose shape check: something, `@`, something, `.`, something.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if !is_valid_email(email) {
        return Err(CoreError::invalid_field(
            "author_email",
            "Email address is not valid",
        ));
    }
    Ok(())
}

/// Private inquiries need a secret of at least [`MIN_ACCESS_SECRET_LENGTH`]
/// characters, counted as written (it is compared verbatim, so whitespace
/// counts). Public inquiries accept anything here; the secret is dropped
/// by [`normalize_access_secret`].
pub fn validate_access_secret(is_public: bool, secret: Option<&str>) -> Result<(), CoreError> {
    if is_public {
        return Ok(());
    }
    let secret = secret.unwrap_or_default();
    if secret.is_empty() {
        return Err(CoreError::invalid_field(
            "access_secret",
            "A password is required for private inquiries",
        ));
    }
    if secret.chars().count() < MIN_ACCESS_SECRET_LENGTH {
        return Err(CoreError::invalid_field(
            "access_secret",
            format!("Password must be at least {MIN_ACCESS_SECRET_LENGTH} characters long"),
        ));
    }
    Ok(())
}

/// The secret to persist: present only for private inquiries.
pub fn normalize_access_secret(is_public: bool, secret: Option<String>) -> Option<String> {
    if is_public {
        None
    } else {
        secret
    }
}

/// Validate the attachment set as a whole, then each file.
pub fn validate_attachments(attachments: &[AttachmentCandidate<'_>]) -> Result<(), CoreError> {
    if attachments.len() > MAX_ATTACHMENTS {
        return Err(CoreError::invalid_field(
            "attached_images",
            format!(
                "Too many images: max {MAX_ATTACHMENTS} per inquiry (got {})",
                attachments.len()
            ),
        ));
    }
    attachments.iter().try_for_each(validate_attachment)
}

pub fn validate_attachment(candidate: &AttachmentCandidate<'_>) -> Result<(), CoreError> {
    if candidate.size_bytes > MAX_ATTACHMENT_BYTES {
        return Err(CoreError::invalid_field(
            "attached_images",
            format!(
                "'{}' is larger than the 5MB limit ({} bytes)",
                candidate.file_name, candidate.size_bytes
            ),
        ));
    }
    if !candidate
        .content_type
        .starts_with(ATTACHMENT_CONTENT_TYPE_PREFIX)
    {
        return Err(CoreError::invalid_field(
            "attached_images",
            format!(
                "'{}' is not an image (content type '{}')",
                candidate.file_name, candidate.content_type
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn public_submission() -> Submission<'static> {
        Submission {
            title: "Q1",
            content: "hello",
            category: "general",
            author_name: "Alice",
            author_email: "a@b.com",
            is_public: true,
            access_secret: None,
        }
    }

    fn image(size_bytes: u64) -> AttachmentCandidate<'static> {
        AttachmentCandidate {
            file_name: "photo.png",
            content_type: "image/png",
            size_bytes,
        }
    }

    fn failing_field(result: Result<(), CoreError>) -> &'static str {
        match result {
            Err(CoreError::InvalidField { field, .. }) => field,
            other => panic!("expected InvalidField, got {other:?}"),
        }
    }

    #[test]
    fn valid_public_submission_passes() {
        assert!(validate_submission(&public_submission(), &[]).is_ok());
    }

    #[test]
    fn blank_title_is_rejected() {
        let sub = Submission {
            title: "   ",
            ..public_submission()
        };
        assert_eq!(failing_field(validate_submission(&sub, &[])), "title");
    }

    #[test]
    fn content_of_exactly_2000_chars_is_accepted() {
        let content = "a".repeat(2000);
        let sub = Submission {
            content: &content,
            ..public_submission()
        };
        assert!(validate_submission(&sub, &[]).is_ok());
    }

    #[test]
    fn content_of_2001_chars_is_rejected() {
        let content = "a".repeat(2001);
        let sub = Submission {
            content: &content,
            ..public_submission()
        };
        assert_eq!(failing_field(validate_submission(&sub, &[])), "content");
    }

    #[test]
    fn content_length_counts_characters_not_bytes() {
        // 2000 three-byte characters is still within the limit.
        let content = "문".repeat(2000);
        assert!(validate_content(&content).is_ok());
    }

    #[test]
    fn first_violation_wins() {
        let sub = Submission {
            title: "",
            content: "",
            author_email: "nope",
            ..public_submission()
        };
        assert_eq!(failing_field(validate_submission(&sub, &[])), "title");
    }

    #[test]
    fn missing_author_name_is_rejected() {
        let sub = Submission {
            author_name: "",
            ..public_submission()
        };
        assert_eq!(failing_field(validate_submission(&sub, &[])), "author_name");
    }

    #[test]
    fn email_shapes() {
        assert!(validate_email("a@b.com").is_ok());
        assert!(validate_email("first.last@sub.example.co").is_ok());
        assert!(validate_email("a@b").is_err());
        assert!(validate_email("a b@c.com").is_err());
        assert!(validate_email("@b.com").is_err());
        assert!(validate_email("a@@b.com").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn unknown_category_is_rejected() {
        let sub = Submission {
            category: "complaints",
            ..public_submission()
        };
        assert_eq!(failing_field(validate_submission(&sub, &[])), "category");
    }

    #[test]
    fn private_submission_requires_secret() {
        let sub = Submission {
            is_public: false,
            access_secret: None,
            ..public_submission()
        };
        assert_eq!(failing_field(validate_submission(&sub, &[])), "access_secret");
    }

    #[test]
    fn private_secret_minimum_length() {
        assert!(validate_access_secret(false, Some("123")).is_err());
        assert!(validate_access_secret(false, Some("1234")).is_ok());
        assert!(validate_access_secret(false, Some("")).is_err());
        assert!(validate_access_secret(false, Some("    ")).is_ok());
        assert!(validate_access_secret(false, Some("   ")).is_err());
    }

    #[test]
    fn public_submission_ignores_secret() {
        assert!(validate_access_secret(true, Some("x")).is_ok());
        assert_eq!(normalize_access_secret(true, Some("x".into())), None);
        assert_eq!(
            normalize_access_secret(false, Some("1234".into())),
            Some("1234".to_string())
        );
    }

    #[test]
    fn five_attachments_are_accepted() {
        let files = vec![image(1024); 5];
        assert!(validate_submission(&public_submission(), &files).is_ok());
    }

    #[test]
    fn sixth_attachment_rejects_whole_submission() {
        let files = vec![image(1024); 6];
        let err = validate_submission(&public_submission(), &files).unwrap_err();
        assert_matches!(
            err,
            CoreError::InvalidField { field: "attached_images", ref message } if message.contains("max 5")
        );
    }

    #[test]
    fn attachment_size_boundary() {
        assert!(validate_attachment(&image(MAX_ATTACHMENT_BYTES)).is_ok());
        assert!(validate_attachment(&image(MAX_ATTACHMENT_BYTES + 1)).is_err());
    }

    #[test]
    fn non_image_attachment_is_rejected() {
        let pdf = AttachmentCandidate {
            file_name: "brochure.pdf",
            content_type: "application/pdf",
            size_bytes: 10,
        };
        assert_eq!(failing_field(validate_attachment(&pdf)), "attached_images");
    }

    #[test]
    fn edit_rules_match_submission_rules() {
        assert!(validate_edit("New title", "New body").is_ok());
        assert_eq!(failing_field(validate_edit(" ", "body")), "title");
        assert_eq!(failing_field(validate_edit("t", &"x".repeat(2001))), "content");
    }

    #[test]
    fn blank_reply_is_rejected() {
        assert!(validate_reply("answer text").is_ok());
        assert_eq!(failing_field(validate_reply("  \n")), "admin_reply");
    }
}

//! # vigil-core
//!
//! Probe report types and shared helpers for Vigil.
//!
//! Every diagnostic command builds a [`ProbeReport`]: an ordered, in-memory
//! sequence of [`ProbeOutcome`] records, one per external dependency probed.
//! The report is discarded at process exit; its only lasting signal is the
//! process exit code (0 iff no probe reported FAIL).

pub mod report;

pub use report::{ProbeOutcome, ProbeReport, ProbeStatus};

/// Maximum characters of free-text detail shown per outcome.
pub const DETAIL_LIMIT: usize = 200;

/// Mask a secret for display.
///
/// Values longer than 12 characters keep the first 8 and last 4 characters;
/// shorter values are replaced with `***` entirely.
#[must_use]
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() > 12 {
        let head: String = chars[..8].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        String::from("***")
    }
}

/// Truncate free-text detail to `max_chars`, appending `...` when cut.
///
/// Operates on characters, not bytes, so multibyte error messages from remote
/// services never split a UTF-8 boundary.
#[must_use]
pub fn truncate_detail(detail: &str, max_chars: usize) -> String {
    if detail.chars().count() <= max_chars {
        return detail.to_string();
    }
    let truncated: String = detail.chars().take(max_chars).collect();
    format!("{truncated}...")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{mask_secret, truncate_detail};

    #[test]
    fn mask_long_secret_keeps_edges() {
        let masked = mask_secret("sk-abcdefghijklmnopqrstuvwxyz");
        assert_eq!(masked, "sk-abcde...wxyz");
    }

    #[test]
    fn mask_short_secret_fully() {
        assert_eq!(mask_secret("dev123"), "***");
        assert_eq!(mask_secret(""), "***");
    }

    #[test]
    fn mask_boundary_length_is_fully_masked() {
        // Exactly 12 characters is still considered too short to expose.
        assert_eq!(mask_secret("abcdefghijkl"), "***");
    }

    #[test]
    fn truncate_short_detail_unchanged() {
        assert_eq!(truncate_detail("all good", 200), "all good");
    }

    #[test]
    fn truncate_long_detail_appends_ellipsis() {
        let long = "x".repeat(250);
        let out = truncate_detail(&long, 200);
        assert_eq!(out.chars().count(), 203);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn truncate_handles_multibyte_content() {
        let detail = "错".repeat(300);
        let out = truncate_detail(&detail, 200);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 203);
    }
}

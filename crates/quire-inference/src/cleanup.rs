//! Model output cleanup.
//!
//! Reasoning models may prefix their answer with `<think>...</think>`, and
//! chat models like to wrap a rewritten passage in a code fence. Neither
//! belongs in a note.

use once_cell::sync::Lazy;
use regex::Regex;

static THINK_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("valid think-block pattern"));

static WRAPPING_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\A```[A-Za-z0-9_-]*[ \t]*\r?\n(.*?)\r?\n?```\z").expect("valid fence pattern")
});

/// Strip reasoning blocks and a fence around the whole answer, then trim.
///
/// An unterminated `<think>` means the answer never started; the result is
/// empty.
pub fn clean_response(raw: &str) -> String {
    let without_think = THINK_BLOCK.replace_all(raw, "");
    let mut text = without_think.trim();
    if let Some(idx) = text.find("<think>") {
        text = text[..idx].trim();
    }
    match WRAPPING_FENCE.captures(text) {
        Some(caps) => caps
            .get(1)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_trimmed() {
        assert_eq!(clean_response("  Hello there.\n"), "Hello there.");
    }

    #[test]
    fn test_think_block_removed() {
        let raw = "<think>The user wants brevity.\nOK.</think>\n\nShort version.";
        assert_eq!(clean_response(raw), "Short version.");
    }

    #[test]
    fn test_unterminated_think_yields_empty() {
        assert_eq!(clean_response("<think>still reasoning"), "");
    }

    #[test]
    fn test_wrapping_fence_removed() {
        let raw = "```markdown\n# Title\n\nBody text\n```";
        assert_eq!(clean_response(raw), "# Title\n\nBody text");
    }

    #[test]
    fn test_inner_fence_kept() {
        let raw = "Use this:\n```rust\nfn main() {}\n```";
        assert_eq!(clean_response(raw), raw);
    }
}

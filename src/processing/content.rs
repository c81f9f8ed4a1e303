use sha2::{Digest, Sha256};

/// Extensions that mark a URL as pointing at a document rather than a page.
const DOCUMENT_EXTENSIONS: &[&str] = &[".pdf", ".doc", ".docx"];

/// Stable fingerprint of a piece of text for exact-duplicate detection.
///
/// Case and whitespace runs are normalized away before hashing, so titles
/// that differ only in spacing or capitalization fingerprint identically.
pub fn fingerprint(text: &str) -> String {
    let normalized = text
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Lexical near-duplicate test between two strings.
///
/// The ratio is a normalized Levenshtein score over the lower-cased inputs;
/// the pair counts as similar only when the ratio strictly exceeds
/// `threshold`. Symmetric in its arguments. O(n*m) on string length, which
/// is fine for titles and snippets.
pub fn is_similar(a: &str, b: &str, threshold: f64) -> bool {
    strsim::normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase()) > threshold
}

/// Keyword test of whether a (text, url) pair is on-topic.
///
/// A multi-word keyword matches when all of its tokens appear somewhere in
/// the text, or all appear in the URL with hyphens read as spaces; a
/// single-word keyword matches either as a plain substring. URLs that point
/// at documents get a second, looser pass over the text alone, since a
/// file's slug rarely spells out its subject.
pub fn is_relevant(text: &str, url: &str, keywords: &[String]) -> bool {
    let text = text.to_lowercase();
    let url = url.to_lowercase().replace('-', " ");
    let is_document = DOCUMENT_EXTENSIONS.iter().any(|ext| url.contains(ext));

    for keyword in keywords {
        let keyword = keyword.to_lowercase();
        let tokens: Vec<&str> = keyword.split_whitespace().collect();
        let matched = if tokens.len() > 1 {
            tokens.iter().all(|token| text.contains(token))
                || tokens.iter().all(|token| url.contains(token))
        } else {
            text.contains(&keyword) || url.contains(&keyword)
        };
        if matched {
            return true;
        }
    }

    if is_document {
        return keywords
            .iter()
            .any(|keyword| text.contains(&keyword.to_lowercase()));
    }

    false
}

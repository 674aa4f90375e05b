//! Document → plain text, plus the small text heuristics shared by extractors.

use std::sync::LazyLock;

use regex::Regex;

use crate::extraction::{ExtractionError, ResumeDocument};

/// Extracts text by file extension. PDF parsing runs on the blocking pool.
pub async fn document_text(document: &ResumeDocument) -> Result<String, ExtractionError> {
    let extension = document.extension().unwrap_or_default();
    match extension.as_str() {
        "pdf" => {
            let bytes = document.bytes.clone();
            let filename = document.filename.clone();
            tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
                .await
                .map_err(|e| ExtractionError::Unreadable(format!("{filename}: {e}")))?
                .map_err(|e| ExtractionError::Unreadable(format!("{}: {e}", document.filename)))
        }
        "txt" | "md" => Ok(String::from_utf8_lossy(&document.bytes).into_owned()),
        _ => Err(ExtractionError::UnsupportedFormat(if extension.is_empty() {
            document.filename.clone()
        } else {
            format!(".{extension}")
        })),
    }
}

/// Case-insensitive word-boundary matcher for one skill and all its spellings.
/// Separators such as `/` or `,` between skills ("React/Redux") are boundaries.
#[derive(Debug, Clone)]
pub struct SkillPattern(Regex);

impl SkillPattern {
    pub fn new<'a>(spellings: impl IntoIterator<Item = &'a str>) -> Result<Self, regex::Error> {
        let mut spellings: Vec<&str> = spellings
            .into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        // Longest first; HashMap-backed synonym order must not leak into the pattern.
        spellings.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        spellings.dedup();

        let alternatives: Vec<String> = spellings.into_iter().map(bounded).collect();
        let pattern = if alternatives.is_empty() {
            // Never matches.
            r"\b\B".to_string()
        } else {
            format!("(?i)(?:{})", alternatives.join("|"))
        };
        Regex::new(&pattern).map(Self)
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }
}

/// `\b` only works next to word characters; "c++" or ".net" need an explicit
/// non-word neighbour instead.
fn bounded(spelling: &str) -> String {
    let body = regex::escape(spelling)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(r"\s+");
    let starts_word = spelling.chars().next().is_some_and(is_word_char);
    let ends_word = spelling.chars().last().is_some_and(is_word_char);
    format!(
        "{}{body}{}",
        if starts_word { r"\b" } else { r"(?:^|[^\w])" },
        if ends_word { r"\b" } else { r"(?:$|[^\w])" },
    )
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b[a-z0-9._%+-]+@[a-z0-9-]+(?:\.[a-z0-9-]+)*\.[a-z]{2,}\b")
        .expect("email pattern is valid")
});

/// First e-mail address in the text, lower-cased.
pub fn find_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_lowercase())
}

/// The first short, name-like line of the document; otherwise a title-cased
/// filename stem; otherwise "New Candidate".
pub fn guess_candidate_name(text: &str, filename: &str) -> String {
    let from_text = text
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .filter(|l| {
            let words = l.split_whitespace().count();
            words <= 5
                && !l.contains('@')
                && !l.chars().any(|c| c.is_ascii_digit())
                && l.chars().any(char::is_alphabetic)
        });
    if let Some(line) = from_text {
        return line.split_whitespace().collect::<Vec<_>>().join(" ");
    }

    let stem = std::path::Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let words: Vec<String> = stem
        .split(|c: char| c == '_' || c == '-' || c == '.' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .filter(|w| !matches!(w.to_lowercase().as_str(), "resume" | "cv" | "final"))
        .map(title_case)
        .collect();
    if words.is_empty() {
        "New Candidate".to_string()
    } else {
        words.join(" ")
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(spellings: &[&str]) -> SkillPattern {
        SkillPattern::new(spellings.iter().copied()).unwrap()
    }

    #[test]
    fn test_pattern_respects_word_boundaries() {
        let git = pattern(&["git"]);
        assert!(!git.is_match("Worked with GitHub and Reactive streams"));
        assert!(git.is_match("Version control: Git."));
        assert!(!pattern(&["react"]).is_match("Reactive streams"));
    }

    #[test]
    fn test_slash_joined_skills_match_separately() {
        let text = "Stack: React/Redux, Python/Django";
        assert!(pattern(&["react"]).is_match(text));
        assert!(pattern(&["redux"]).is_match(text));
        assert!(pattern(&["django"]).is_match(text));
        assert!(pattern(&["ci/cd"]).is_match("Owned CI/CD pipelines"));
    }

    #[test]
    fn test_multi_word_spelling_spans_whitespace() {
        let rest = pattern(&["rest api", "restful"]);
        assert!(rest.is_match("Built a REST   API for payments."));
        assert!(rest.is_match("RESTful services"));
        assert!(!rest.is_match("the rest of the team"));
    }

    #[test]
    fn test_symbol_edged_spellings() {
        let cpp = pattern(&["c++"]);
        assert!(cpp.is_match("Languages: C++, Rust"));
        assert!(!cpp.is_match("abc++"));
        assert!(pattern(&[".net"]).is_match("ASP .NET core"));
        assert!(pattern(&["node.js"]).is_match("Node.js/Express"));
    }

    #[test]
    fn test_empty_pattern_never_matches() {
        assert!(!pattern(&["  "]).is_match("anything at all"));
        assert!(!pattern(&[]).is_match(""));
    }

    #[test]
    fn test_find_email() {
        let text = "Jane Smith\nContact: <Jane.Smith@Example.com>, +1 555 0100";
        assert_eq!(find_email(text).as_deref(), Some("jane.smith@example.com"));
        assert_eq!(find_email("mailto:a@b.io.").as_deref(), Some("a@b.io"));
        assert_eq!(find_email("twitter @handle, no mail"), None);
        assert_eq!(find_email("user@localhost"), None);
    }

    #[test]
    fn test_name_from_first_line() {
        assert_eq!(
            guess_candidate_name("\n\n  Alex   Johnson \nSenior Engineer", "x.pdf"),
            "Alex Johnson"
        );
    }

    #[test]
    fn test_name_falls_back_to_filename() {
        let text = "alex@example.com\nReact";
        assert_eq!(
            guess_candidate_name(text, "alex_johnson_resume.pdf"),
            "Alex Johnson"
        );
    }

    #[test]
    fn test_name_last_resort() {
        assert_eq!(guess_candidate_name("", "resume.pdf"), "New Candidate");
    }

    #[tokio::test]
    async fn test_plain_text_document() {
        let doc = ResumeDocument::new("cv.TXT", "Hello\nReact");
        assert_eq!(document_text(&doc).await.unwrap(), "Hello\nReact");
    }

    #[tokio::test]
    async fn test_docx_is_unsupported() {
        let doc = ResumeDocument::new("cv.docx", vec![0u8, 1, 2]);
        let err = document_text(&doc).await.unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedFormat(ext) if ext == ".docx"));
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_unreadable() {
        let doc = ResumeDocument::new("cv.pdf", "definitely not a pdf");
        let err = document_text(&doc).await.unwrap_err();
        assert!(matches!(err, ExtractionError::Unreadable(_)));
    }
}

// Text Normalization Service
// Reduces free-form caption text to a canonical form for language detection

use regex::Regex;

/// French accented letters kept by the allow-list filter. The filter is
/// case-sensitive; uppercase accented letters do not survive it.
const FRENCH_ACCENTED: &str = "àâçéèêëîïôûùüÿñæœ";

/// Arabic script blocks, diacritics and presentation forms included.
pub fn is_arabic_char(c: char) -> bool {
    matches!(c,
        '\u{0600}'..='\u{06FF}'
            | '\u{0750}'..='\u{077F}'
            | '\u{08A0}'..='\u{08FF}'
            | '\u{FB50}'..='\u{FDFF}'
            | '\u{FE70}'..='\u{FEFF}')
}

pub fn is_french_accented(c: char) -> bool {
    FRENCH_ACCENTED.contains(c)
}

/// Normalize caption text: strip URLs, markup, social tags, emoji, sentence
/// punctuation, bracket glyphs and standalone numbers, filter to the allowed
/// character classes, then fold whitespace and case.
///
/// Noise removal runs before the character-class filter so leftover markup
/// fragments cannot leak through as valid content. Idempotent.
pub fn preprocess(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut s = text.to_string();

    let url_re = Regex::new(r"(?i)https?://\S+").unwrap();
    s = url_re.replace_all(&s, "").to_string();
    let www_re = Regex::new(r"(?i)www\.\S+").unwrap();
    s = www_re.replace_all(&s, "").to_string();

    // HTML tags and named entities
    let tag_re = Regex::new(r"<[^>]*>").unwrap();
    s = tag_re.replace_all(&s, "").to_string();
    let entity_re = Regex::new(r"&[a-zA-Z]+;").unwrap();
    s = entity_re.replace_all(&s, "").to_string();

    // Mentions and hashtags, token boundary = next whitespace
    let social_re = Regex::new(r"[@#]\S+").unwrap();
    s = social_re.replace_all(&s, "").to_string();

    let emoji_re = Regex::new(
        r"[\u{1F300}-\u{1F5FF}\u{1F600}-\u{1F64F}\u{1F680}-\u{1F6FF}\u{1F700}-\u{1F77F}\u{1F780}-\u{1F7FF}\u{1F800}-\u{1F8FF}\u{1F900}-\u{1F9FF}\u{1FA00}-\u{1FA6F}\u{1FA70}-\u{1FAFF}\u{2600}-\u{26FF}\u{2700}-\u{27BF}]",
    )
    .unwrap();
    s = emoji_re.replace_all(&s, "").to_string();

    // Sentence punctuation, Arabic comma and question mark included
    s = s.replace(['.', ',', '!', '?', '،', '؟'], "");

    // Bracket glyphs only; bracketed asides stay part of the text
    s = s.replace(['(', ')', '{', '}', '[', ']'], "");

    // Standalone numeric tokens; digits inside mixed tokens stay
    s = s
        .split_whitespace()
        .filter(|tok| !tok.chars().all(|c| c.is_ascii_digit()))
        .collect::<Vec<_>>()
        .join(" ");

    // Allow-list filter: ASCII letters and digits, whitespace, Arabic script,
    // French accented letters
    s = s
        .chars()
        .filter(|&c| {
            c.is_ascii_alphanumeric()
                || c.is_whitespace()
                || is_arabic_char(c)
                || is_french_accented(c)
        })
        .collect();

    let ws_re = Regex::new(r"\s+").unwrap();
    s = ws_re.replace_all(&s, " ").trim().to_string();
    s = s.to_lowercase();
    // Re-apply the standalone-number drop after case folding: the allow-list
    // can reduce a mixed token to bare digits. Collapses whitespace again as
    // a side effect.
    s = s
        .split_whitespace()
        .filter(|tok| !tok.chars().all(|c| c.is_ascii_digit()))
        .collect::<Vec<_>>()
        .join(" ");

    s
}

/// True iff the normalized form of `text` is non-empty and contains at least
/// one ASCII letter or one Arabic-script character. Purely numeric or
/// punctuation-only strings are not valid content.
pub fn has_valid_content(text: &str) -> bool {
    let cleaned = preprocess(text);
    !cleaned.is_empty()
        && cleaned
            .chars()
            .any(|c| c.is_ascii_alphabetic() || is_arabic_char(c))
}

/// Normalize and split into voting segments: whitespace-delimited tokens of
/// at least 3 characters, in input order.
pub fn segment_text(text: &str) -> Vec<String> {
    preprocess(text)
        .split_whitespace()
        .filter(|seg| seg.chars().count() >= 3)
        .map(|seg| seg.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preprocess_strips_urls() {
        assert_eq!(
            preprocess("check this http://example.com for more"),
            "check this for more"
        );
        assert_eq!(preprocess("visit https://example.com/path?a=1 now"), "visit now");
        assert_eq!(preprocess("see www.example.com today"), "see today");
    }

    #[test]
    fn test_preprocess_strips_html() {
        assert_eq!(preprocess("<p>Hello</p> <br/> <div>World</div>"), "hello world");
        assert_eq!(preprocess("fish &amp; chips &quot;fresh&quot;"), "fish chips fresh");
    }

    #[test]
    fn test_preprocess_strips_social_tags() {
        assert_eq!(preprocess("hello @user check #hashtag out"), "hello check out");
    }

    #[test]
    fn test_preprocess_strips_emojis() {
        assert_eq!(preprocess("Hello \u{1F44B} World \u{1F30D} ok \u{2764}"), "hello world ok");
    }

    #[test]
    fn test_preprocess_strips_sentence_punctuation() {
        assert_eq!(preprocess("hello, world! really? yes."), "hello world really yes");
        // Arabic comma and question mark
        assert_eq!(preprocess("مرحبا، كيف الحال؟"), "مرحبا كيف الحال");
    }

    #[test]
    fn test_preprocess_keeps_bracketed_content() {
        // Only the bracket glyphs go; the aside stays part of the text
        assert_eq!(preprocess("before (aside) after"), "before aside after");
        assert_eq!(preprocess("a {b} c [d] e"), "a b c d e");
    }

    #[test]
    fn test_preprocess_drops_standalone_numbers_only() {
        assert_eq!(preprocess("call 123 now"), "call now");
        // Digits embedded in a mixed token are retained (Arabizi signal)
        assert_eq!(preprocess("s7ab rja3 liya"), "s7ab rja3 liya");
    }

    #[test]
    fn test_preprocess_preserves_arabic_and_french() {
        assert_eq!(preprocess("مرحبا بالعالم"), "مرحبا بالعالم");
        assert_eq!(preprocess("le café était fermé"), "le café était fermé");
    }

    #[test]
    fn test_preprocess_lowercases_ascii() {
        assert_eq!(preprocess("Hello WORLD"), "hello world");
    }

    #[test]
    fn test_preprocess_collapses_whitespace() {
        assert_eq!(preprocess("  hello \t\n  world  "), "hello world");
    }

    #[test]
    fn test_preprocess_is_idempotent() {
        let samples = [
            "Hello, world! http://x.com #tag @user (aside) 123",
            "مرحبا بالعالم 123 يا s7ab",
            "Le café était fermé... très tôt!",
            "<b>bold</b> &amp; plain \u{1F600}",
            "",
            "   ",
            "12345",
            "£3 left",
        ];
        for sample in samples {
            let once = preprocess(sample);
            assert_eq!(preprocess(&once), once, "not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_has_valid_content() {
        assert!(has_valid_content("hello"));
        assert!(has_valid_content("مرحبا"));
        assert!(has_valid_content("x123y"));
        assert!(!has_valid_content(""));
        assert!(!has_valid_content("   "));
        assert!(!has_valid_content("12345"));
        assert!(!has_valid_content("!!! ... ???"));
        assert!(!has_valid_content("\u{1F600}\u{1F30D}"));
    }

    #[test]
    fn test_segment_text_drops_short_tokens() {
        assert_eq!(
            segment_text("bonjour le monde"),
            vec!["bonjour".to_string(), "monde".to_string()]
        );
    }

    #[test]
    fn test_segment_text_preserves_order() {
        assert_eq!(
            segment_text("Premier texte, second TEXTE!"),
            vec!["premier".to_string(), "texte".to_string(), "second".to_string(), "texte".to_string()]
        );
    }

    #[test]
    fn test_valid_content_produces_segments() {
        // Inputs with at least one token of length >= 3 after cleaning
        let samples = ["hello world", "مرحبا", "café!", "one 22 three"];
        for sample in samples {
            assert!(has_valid_content(sample));
            assert!(!segment_text(sample).is_empty(), "no segments for {:?}", sample);
        }
    }
}

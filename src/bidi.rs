//! Right-to-left text handling for report rendering.
//!
//! Detection is a character-class scan over the Hebrew and Arabic blocks
//! (including the Arabic presentation forms). Rendering such a line with
//! left-to-right layout machinery reverses the word order only; character
//! order within each word is preserved, applied uniformly whether or not
//! embedded numerals or Latin fragments are present.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RTL_CHARS: Regex = Regex::new(
        "[\u{0590}-\u{05FF}\u{0600}-\u{06FF}\u{0750}-\u{077F}\u{FB50}-\u{FDFF}\u{FE70}-\u{FEFF}]"
    )
    // Character-class pattern, cannot fail to compile
    .unwrap();
}

/// Whether the text contains any right-to-left script characters.
pub fn is_rtl(text: &str) -> bool {
    RTL_CHARS.is_match(text)
}

/// Reorder a logical-order line for left-to-right rendering.
///
/// RTL lines come back with whitespace-separated words reversed; LTR
/// lines pass through unchanged.
pub fn visual_order(text: &str) -> String {
    if !is_rtl(text) {
        return text.to_string();
    }
    let mut words: Vec<&str> = text.split_whitespace().collect();
    words.reverse();
    words.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_hebrew() {
        assert!(is_rtl("האם יש לך אלרגיות?"));
        assert!(is_rtl("mixed שלום text"));
    }

    #[test]
    fn test_detects_arabic() {
        assert!(is_rtl("هل لديك حساسية؟"));
    }

    #[test]
    fn test_latin_is_ltr() {
        assert!(!is_rtl("Do you have any allergies?"));
        assert!(!is_rtl(""));
        assert!(!is_rtl("1234 !?"));
    }

    #[test]
    fn test_visual_order_reverses_rtl_words() {
        assert_eq!(visual_order("האם יש לך"), "לך יש האם");
    }

    #[test]
    fn test_visual_order_preserves_chars_within_words() {
        let reordered = visual_order("שלום עולם");
        assert_eq!(reordered, "עולם שלום");
        assert!(reordered.contains("שלום"));
    }

    #[test]
    fn test_visual_order_uniform_with_embedded_numbers() {
        // Numerals travel with the word reversal, character order intact
        assert_eq!(visual_order("גיל 45 שנים"), "שנים 45 גיל");
    }

    #[test]
    fn test_visual_order_ltr_passthrough() {
        assert_eq!(visual_order("plain english line"), "plain english line");
    }
}

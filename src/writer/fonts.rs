//! Base-14 font metrics and line wrapping.
//!
//! The report only sets Helvetica in regular and bold, so the standard
//! AFM advance widths for those two faces are carried inline (units of
//! 1/1000 em). Characters outside the table fall back to 556, the width
//! of a Helvetica digit.

/// The two faces the report uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    /// Helvetica regular
    Helvetica,
    /// Helvetica bold
    HelveticaBold,
}

impl Font {
    /// PostScript base font name.
    pub fn base_name(&self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Name used in the page resource dictionary.
    pub fn resource_name(&self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "HelveticaBold",
        }
    }

    /// Width of `text` in points at `font_size`.
    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        let units: f32 = text.chars().map(|c| self.char_width(c)).sum();
        units * font_size / 1000.0
    }

    /// Advance width of one character in 1/1000 em.
    pub fn char_width(&self, ch: char) -> f32 {
        match self {
            Font::Helvetica => helvetica_width(ch),
            Font::HelveticaBold => helvetica_bold_width(ch),
        }
    }

    /// Greedy word wrap into lines no wider than `max_width` points.
    ///
    /// A single word wider than the limit gets its own line rather than
    /// being split mid-word.
    pub fn wrap_text(&self, text: &str, font_size: f32, max_width: f32) -> Vec<String> {
        let mut lines = Vec::new();
        let mut current = String::new();

        for word in text.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };
            if self.text_width(&candidate, font_size) <= max_width || current.is_empty() {
                current = candidate;
            } else {
                lines.push(current);
                current = word.to_string();
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        if lines.is_empty() {
            lines.push(String::new());
        }
        lines
    }
}

/// Standard AFM widths for Helvetica.
fn helvetica_width(ch: char) -> f32 {
    match ch {
        ' ' | '!' | ',' | '.' | '/' | ':' | ';' | 'I' | '\\' => 278.0,
        '"' => 355.0,
        '#' | '$' | '?' | '_' | '0'..='9' => 556.0,
        '%' => 889.0,
        '&' | 'A' | 'B' | 'E' | 'K' | 'P' | 'S' | 'V' | 'X' | 'Y' => 667.0,
        '\'' => 191.0,
        '(' | ')' | '-' | '`' | 'r' => 333.0,
        '*' => 389.0,
        '+' | '<' | '=' | '>' | '~' => 584.0,
        '@' => 1015.0,
        'C' | 'D' | 'H' | 'N' | 'R' | 'U' => 722.0,
        'F' | 'T' | 'Z' => 611.0,
        'G' | 'O' | 'Q' => 778.0,
        'J' | 'c' | 'k' | 's' | 'v' | 'x' | 'y' | 'z' => 500.0,
        'L' | 'a' | 'b' | 'd' | 'e' | 'g' | 'h' | 'n' | 'o' | 'p' | 'q' | 'u' => 556.0,
        'M' | 'm' => 833.0,
        'W' => 944.0,
        '[' | ']' => 278.0,
        '^' => 469.0,
        'f' | 't' => 278.0,
        'i' | 'j' | 'l' => 222.0,
        'w' => 722.0,
        '{' | '}' => 334.0,
        '|' => 260.0,
        _ => 556.0,
    }
}

/// Standard AFM widths for Helvetica-Bold.
fn helvetica_bold_width(ch: char) -> f32 {
    match ch {
        ' ' | ',' | '.' | '/' | 'I' | '\\' | 'i' | 'j' | 'l' => 278.0,
        '!' | '(' | ')' | '-' | ':' | ';' | '[' | ']' | '`' | 'f' | 't' => 333.0,
        '"' => 474.0,
        '#' | '$' | '_' | '0'..='9' => 556.0,
        '%' => 889.0,
        '&' | 'A' | 'C' | 'D' | 'H' | 'K' | 'N' | 'R' | 'U' | 'B' => 722.0,
        '\'' => 238.0,
        '*' | 'r' => 389.0,
        '+' | '<' | '=' | '>' | '^' | '~' => 584.0,
        '?' | 'F' | 'L' | 'T' | 'Z' | 'b' | 'd' | 'g' | 'h' | 'n' | 'o' | 'p' | 'q' | 'u' => 611.0,
        '@' => 975.0,
        'E' => 667.0,
        'J' | 'a' | 'c' | 'e' | 'k' | 's' | 'v' | 'x' | 'y' => 556.0,
        'M' => 833.0,
        'G' | 'O' | 'Q' | 'w' => 778.0,
        'P' | 'S' | 'V' | 'X' | 'Y' => 667.0,
        'W' => 944.0,
        'm' => 889.0,
        'z' => 500.0,
        '{' | '}' => 389.0,
        '|' => 280.0,
        _ => 556.0,
    }
}

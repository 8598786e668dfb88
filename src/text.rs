//! Lexical utilities shared by the parser: paragraph segmentation and
//! English verb/past-participle agreement.

const VOWELS: &str = "aeiou";

fn is_consonant(c: char) -> bool {
    c.is_ascii_lowercase() && !VOWELS.contains(c)
}

/// Reads lines starting at `start` until a blank line or the end of input,
/// joining them with `\n`.
///
/// Returns the paragraph text (without the terminating blank line) and the
/// index of the first line after that blank line (or `lines.len()` at
/// end-of-input). Calling this again with the returned index is idempotent
/// at end-of-input: it returns an empty paragraph.
pub fn read_paragraph(lines: &[&str], start: usize) -> (String, usize) {
    let mut end = start;
    while end < lines.len() && !lines[end].is_empty() {
        end += 1;
    }
    let paragraph = lines[start..end].join("\n");
    // Skip the blank line separator itself, if there was one.
    let next = if end < lines.len() { end + 1 } else { end };
    (paragraph, next)
}

/// Returns whether `past_form` is the valid English past participle of
/// `present_form`, under the morphological rules Chef loops use to match a
/// verb (e.g. `Stir`) with its closing participle (e.g. `stirred`).
pub fn verbs_match(present_form: &str, past_form: &str) -> bool {
    let present = present_form.to_lowercase();
    let past = past_form.to_lowercase();

    if present.ends_with('e') {
        return past == format!("{present}d");
    }

    match doubled_consonant_stem(&past) {
        Some(_) if ends_with_doubled_consonant(&present) => past == format!("{present}ed"),
        Some(_) => match present.chars().last() {
            Some(c) if is_consonant(c) => past == format!("{present}{c}ed"),
            _ => false,
        },
        None => past == format!("{present}ed"),
    }
}

/// If `word` ends in `ed` and the two characters right before that `ed` are
/// the same consonant (e.g. `stopped` -> `pp`), returns that stem (`stopp`).
fn doubled_consonant_stem(word: &str) -> Option<&str> {
    let stem = word.strip_suffix("ed")?;
    let chars: Vec<char> = stem.chars().collect();
    let len = chars.len();
    if len < 2 {
        return None;
    }
    let (a, b) = (chars[len - 2], chars[len - 1]);
    (a == b && is_consonant(a)).then_some(stem)
}

fn ends_with_doubled_consonant(word: &str) -> bool {
    let chars: Vec<char> = word.chars().collect();
    let len = chars.len();
    if len < 2 {
        return false;
    }
    let (a, b) = (chars[len - 2], chars[len - 1]);
    a == b && is_consonant(a)
}

/// Character class body for name-like tokens: ASCII letters plus the Latin-1
/// accented letters (À-ÿ without × and ÷).
pub const LETTERS: &str = "A-Za-zÀ-ÖØ-öø-ÿ";

/// Title-case every word: first letter upper, the rest lower. A word starts at
/// any letter not preceded by another letter, so "D'AVILA" → "D'Avila".
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Split each page into lines, in page order.
pub fn document_lines<S: AsRef<str>>(pages: &[S]) -> impl Iterator<Item = &str> {
    pages.iter().flat_map(|p| p.as_ref().lines())
}

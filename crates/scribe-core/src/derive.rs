//! Derivation helpers for post identifiers and reading time.
//!
//! Both functions are pure and infallible; validation upstream guarantees
//! they never see inputs they cannot handle (empty titles or content are
//! rejected before the lifecycle manager runs).

const WORDS_PER_MINUTE: usize = 200;

/// Derive a URL slug from a post title: lower-case, each literal space
/// replaced with a hyphen. Repeated spaces are not collapsed and punctuation
/// is kept as-is; titles are unique, so slugs are in practice too.
pub fn slug_from_title(title: &str) -> String {
    title.to_lowercase().replace(' ', "-")
}

/// Estimate reading time in whole minutes from the post content.
///
/// Markup tags (`<...>`, including an unterminated trailing `<...`) are
/// stripped before counting words; the count is divided by 200 words per
/// minute and rounded up, with a floor of one minute.
pub fn read_time_minutes(content: &str) -> i32 {
    let clean = strip_markup(content);
    let word_count = clean.split_whitespace().count();
    let minutes = word_count.div_ceil(WORDS_PER_MINUTE).max(1);
    minutes as i32
}

fn strip_markup(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut in_tag = false;
    for ch in content.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if in_tag => {}
            _ => out.push(ch),
        }
    }
    out
}

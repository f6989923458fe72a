//! Fuzzy filtering and windowing for the browse UI.
//!
//! A query matches a text when any of these hold:
//!
//! 1. the lowercased text contains the lowercased query
//! 2. the text's initial consonants (choseong) contain the query,
//!    so `ㄱㄴ` finds `가나`
//! 3. the text decomposed into jamo contains the query decomposed the same
//!    way, so `ㄱㅏ` or `갑` find `갑니다`
//!
//! Decomposition splits compound vowels and final consonant clusters
//! (`ㅘ` -> `ㅗㅏ`, `ㄳ` -> `ㄱㅅ`).
//!
//! Queries are matched as typed. A query of spaces only matches text that
//! contains those spaces.

use serde_json::Value;

const SYLLABLE_BASE: u32 = 0xAC00;
const SYLLABLE_LAST: u32 = 0xD7A3;
const JUNG_COUNT: u32 = 21;
const JONG_COUNT: u32 = 28;

const CHOSEONG: [char; 19] = [
    'ㄱ', 'ㄲ', 'ㄴ', 'ㄷ', 'ㄸ', 'ㄹ', 'ㅁ', 'ㅂ', 'ㅃ', 'ㅅ', 'ㅆ', 'ㅇ', 'ㅈ', 'ㅉ', 'ㅊ', 'ㅋ',
    'ㅌ', 'ㅍ', 'ㅎ',
];

const JUNGSEONG: [char; 21] = [
    'ㅏ', 'ㅐ', 'ㅑ', 'ㅒ', 'ㅓ', 'ㅔ', 'ㅕ', 'ㅖ', 'ㅗ', 'ㅘ', 'ㅙ', 'ㅚ', 'ㅛ', 'ㅜ', 'ㅝ', 'ㅞ',
    'ㅟ', 'ㅠ', 'ㅡ', 'ㅢ', 'ㅣ',
];

/// Final consonants; index 0 means "no final".
const JONGSEONG: [Option<char>; 28] = [
    None,
    Some('ㄱ'),
    Some('ㄲ'),
    Some('ㄳ'),
    Some('ㄴ'),
    Some('ㄵ'),
    Some('ㄶ'),
    Some('ㄷ'),
    Some('ㄹ'),
    Some('ㄺ'),
    Some('ㄻ'),
    Some('ㄼ'),
    Some('ㄽ'),
    Some('ㄾ'),
    Some('ㄿ'),
    Some('ㅀ'),
    Some('ㅁ'),
    Some('ㅂ'),
    Some('ㅄ'),
    Some('ㅅ'),
    Some('ㅆ'),
    Some('ㅇ'),
    Some('ㅈ'),
    Some('ㅊ'),
    Some('ㅋ'),
    Some('ㅌ'),
    Some('ㅍ'),
    Some('ㅎ'),
];

/// Split a compound compatibility jamo into its parts.
fn split_compound(jamo: char) -> Option<[char; 2]> {
    Some(match jamo {
        'ㅘ' => ['ㅗ', 'ㅏ'],
        'ㅙ' => ['ㅗ', 'ㅐ'],
        'ㅚ' => ['ㅗ', 'ㅣ'],
        'ㅝ' => ['ㅜ', 'ㅓ'],
        'ㅞ' => ['ㅜ', 'ㅔ'],
        'ㅟ' => ['ㅜ', 'ㅣ'],
        'ㅢ' => ['ㅡ', 'ㅣ'],
        'ㄳ' => ['ㄱ', 'ㅅ'],
        'ㄵ' => ['ㄴ', 'ㅈ'],
        'ㄶ' => ['ㄴ', 'ㅎ'],
        'ㄺ' => ['ㄹ', 'ㄱ'],
        'ㄻ' => ['ㄹ', 'ㅁ'],
        'ㄼ' => ['ㄹ', 'ㅂ'],
        'ㄽ' => ['ㄹ', 'ㅅ'],
        'ㄾ' => ['ㄹ', 'ㅌ'],
        'ㄿ' => ['ㄹ', 'ㅍ'],
        'ㅀ' => ['ㄹ', 'ㅎ'],
        'ㅄ' => ['ㅂ', 'ㅅ'],
        _ => return None,
    })
}

/// Syllable index relative to `가`, if `c` is a precomposed Hangul syllable.
fn syllable_index(c: char) -> Option<u32> {
    let code = c as u32;
    (SYLLABLE_BASE..=SYLLABLE_LAST)
        .contains(&code)
        .then(|| code - SYLLABLE_BASE)
}

fn push_jamo(out: &mut String, jamo: char) {
    match split_compound(jamo) {
        Some(parts) => out.extend(parts),
        None => out.push(jamo),
    }
}

/// Is `c` a compatibility consonant (`ㄱ`..=`ㅎ`)?
fn is_consonant(c: char) -> bool {
    ('\u{3131}'..='\u{314E}').contains(&c)
}

/// The initial consonant of every Hangul syllable.
///
/// `"가나 다"` -> `"ㄱㄴ ㄷ"`. Bare consonants and whitespace are kept;
/// everything else is dropped, so `"깃허브Copilot사용"` -> `"ㄱㅎㅂㅅㅇ"`.
pub fn choseong(text: &str) -> String {
    text.chars()
        .filter_map(|c| match syllable_index(c) {
            Some(idx) => Some(CHOSEONG[(idx / (JUNG_COUNT * JONG_COUNT)) as usize]),
            None if is_consonant(c) || c.is_whitespace() => Some(c),
            None => None,
        })
        .collect()
}

/// Decompose Hangul into individual jamo.
///
/// `"값"` -> `"ㄱㅏㅂㅅ"`, `"와"` -> `"ㅇㅗㅏ"`; other characters pass through.
pub fn disassemble(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 3);
    for c in text.chars() {
        match syllable_index(c) {
            Some(idx) => {
                let cho = idx / (JUNG_COUNT * JONG_COUNT);
                let jung = (idx % (JUNG_COUNT * JONG_COUNT)) / JONG_COUNT;
                let jong = idx % JONG_COUNT;
                out.push(CHOSEONG[cho as usize]);
                push_jamo(&mut out, JUNGSEONG[jung as usize]);
                if let Some(final_jamo) = JONGSEONG[jong as usize] {
                    push_jamo(&mut out, final_jamo);
                }
            }
            None => push_jamo(&mut out, c),
        }
    }
    out
}

/// Does `query` match `text` by substring, choseong, or jamo?
pub fn fuzzy_match(text: &str, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    if text.is_empty() {
        return false;
    }
    if text.to_lowercase().contains(&query.to_lowercase()) {
        return true;
    }
    if choseong(text).contains(query) {
        return true;
    }
    disassemble(text).contains(&disassemble(query))
}

/// Saved entries whose `title` or `description` match `query`, in their
/// original order.
///
/// Entries are kept as raw JSON so fields this crate does not model survive.
/// A missing or non-string `title` reads as empty.
///
/// # Arguments
///
/// * `entries` - The saved array, one JSON value per article
/// * `query` - The search text, used untrimmed
///
/// # Returns
///
/// References into `entries` for every match
pub fn filter_articles<'a>(entries: &'a [Value], query: &str) -> Vec<&'a Value> {
    entries
        .iter()
        .filter(|entry| {
            fuzzy_match(text_field(entry, "title").unwrap_or_default(), query)
                || text_field(entry, "description").is_some_and(|d| fuzzy_match(d, query))
        })
        .collect()
}

fn text_field<'a>(entry: &'a Value, key: &str) -> Option<&'a str> {
    entry.get(key).and_then(Value::as_str)
}

/// The first `visible` items plus whether more remain.
pub fn window<T>(items: &[T], visible: usize) -> (&[T], bool) {
    let end = visible.min(items.len());
    (&items[..end], end < items.len())
}

//! HTML character reference decoding.
//!
//! Numeric references are decoded directly. Named references are looked
//! up by binary search in a small table of the names that show up in
//! headings, then in the full HTML5 table from `html-escape`.

use crate::limits::{MAX_ENTITY_NAME_LENGTH, MAX_NUMERIC_ENTITY_DIGITS, MIN_ENTITY_NAME_LENGTH};
use std::borrow::Cow;

/// Sorted by name (byte order) for `binary_search_by`.
static COMMON_ENTITIES: &[(&str, &str)] = &[
    ("AElig", "Æ"),
    ("Aacute", "Á"),
    ("Agrave", "À"),
    ("Auml", "Ä"),
    ("Ccedil", "Ç"),
    ("Eacute", "É"),
    ("Ntilde", "Ñ"),
    ("Ouml", "Ö"),
    ("Uuml", "Ü"),
    ("aacute", "á"),
    ("acute", "´"),
    ("agrave", "à"),
    ("amp", "&"),
    ("apos", "'"),
    ("auml", "ä"),
    ("bull", "\u{2022}"),
    ("ccedil", "ç"),
    ("cent", "¢"),
    ("copy", "©"),
    ("deg", "°"),
    ("eacute", "é"),
    ("egrave", "è"),
    ("euml", "ë"),
    ("euro", "\u{20AC}"),
    ("frac12", "½"),
    ("gt", ">"),
    ("hellip", "\u{2026}"),
    ("iacute", "í"),
    ("laquo", "«"),
    ("ldquo", "\u{201C}"),
    ("lsquo", "\u{2018}"),
    ("lt", "<"),
    ("mdash", "\u{2014}"),
    ("middot", "·"),
    ("nbsp", "\u{00A0}"),
    ("ndash", "\u{2013}"),
    ("ntilde", "ñ"),
    ("oacute", "ó"),
    ("ouml", "ö"),
    ("para", "¶"),
    ("plusmn", "±"),
    ("pound", "£"),
    ("quot", "\""),
    ("raquo", "»"),
    ("rdquo", "\u{201D}"),
    ("reg", "®"),
    ("rsquo", "\u{2019}"),
    ("sect", "§"),
    ("shy", "\u{00AD}"),
    ("szlig", "ß"),
    ("times", "×"),
    ("trade", "\u{2122}"),
    ("uacute", "ú"),
    ("uuml", "ü"),
    ("yen", "¥"),
];

/// Decode a character reference. `rest` starts just past the `&`.
///
/// Returns the decoded text and the number of bytes consumed after the
/// `&`, including the terminating `;`. `None` means the `&` is literal.
pub fn decode_entity(rest: &[u8]) -> Option<(Cow<'static, str>, usize)> {
    match rest.first() {
        Some(b'#') => decode_numeric(rest),
        Some(b) if b.is_ascii_alphanumeric() => decode_named(rest),
        _ => None,
    }
}

fn decode_numeric(rest: &[u8]) -> Option<(Cow<'static, str>, usize)> {
    let (radix, digits_start) = match rest.get(1) {
        Some(b'x' | b'X') => (16, 2),
        _ => (10, 1),
    };

    let mut i = digits_start;
    let mut codepoint: u32 = 0;
    while i < rest.len() && i - digits_start < MAX_NUMERIC_ENTITY_DIGITS {
        let Some(digit) = (rest[i] as char).to_digit(radix) else {
            break;
        };
        codepoint = codepoint * radix + digit;
        i += 1;
    }

    if i == digits_start || rest.get(i) != Some(&b';') {
        return None;
    }

    let ch = match codepoint {
        0 => char::REPLACEMENT_CHARACTER,
        cp => char::from_u32(cp).unwrap_or(char::REPLACEMENT_CHARACTER),
    };
    Some((Cow::Owned(ch.to_string()), i + 1))
}

fn decode_named(rest: &[u8]) -> Option<(Cow<'static, str>, usize)> {
    let len = rest
        .iter()
        .take(MAX_ENTITY_NAME_LENGTH + 1)
        .take_while(|b| b.is_ascii_alphanumeric())
        .count();
    if !(MIN_ENTITY_NAME_LENGTH..=MAX_ENTITY_NAME_LENGTH).contains(&len) || rest.get(len) != Some(&b';') {
        return None;
    }

    // Alphanumeric ASCII only
    let name = std::str::from_utf8(&rest[..len]).ok()?;
    lookup_named(name).map(|decoded| (decoded, len + 1))
}

/// Resolve an entity name (without `&` and `;`).
pub fn lookup_named(name: &str) -> Option<Cow<'static, str>> {
    if let Ok(idx) = COMMON_ENTITIES.binary_search_by(|(n, _)| (*n).cmp(name)) {
        return Some(Cow::Borrowed(COMMON_ENTITIES[idx].1));
    }

    let reference = format!("&{name};");
    let decoded = html_escape::decode_html_entities(&reference);
    // Unknown names come back untouched. Legacy prefix matches such as
    // `&ampx;` decode only their prefix and leave a longer tail behind.
    if decoded == reference.as_str() || decoded.chars().count() > 2 {
        return None;
    }
    Some(Cow::Owned(decoded.into_owned()))
}

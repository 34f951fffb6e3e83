//! Field name normalization.
//!
//! MediaInfo labels fields for humans (`Frame rate`, `Codec ID/Info`,
//! `Format/Extensions usually used`). Normalized keys are stable identifiers:
//! slashes become word breaks, each word is capitalized and words are joined
//! with underscores.

/// Normalize a raw field name into a `Title_Case_With_Underscores` key.
///
/// 1. Every `/` becomes a space.
/// 2. A character is upper-cased when it starts the name or follows a
///    character that is not alphanumeric. Everything else is left as is,
///    so `ID` stays `ID` and `kHz` stays `kHz`.
/// 3. Every space becomes `_`.
///
/// ```
/// use mediatab_report::normalize_key;
///
/// assert_eq!(normalize_key("Frame/Rate"), "Frame_Rate");
/// assert_eq!(normalize_key("Complete_name"), "Complete_Name");
/// assert_eq!(normalize_key("Codec ID/Info"), "Codec_ID_Info");
/// ```
pub fn normalize_key(raw: &str) -> String {
    let mut key = String::with_capacity(raw.len());
    let mut word_start = true;

    for ch in raw.chars() {
        let ch = if ch == '/' { ' ' } else { ch };
        if word_start {
            key.extend(ch.to_uppercase());
        } else {
            key.push(ch);
        }
        word_start = !ch.is_alphanumeric();
    }

    key.replace(' ', "_")
}

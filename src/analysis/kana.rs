//! Japanese character classes and kana normalization.

const HIRAGANA_START: u32 = 0x3041;
const KATAKANA_START: u32 = 0x30A1;
const KATAKANA_CONVERTIBLE_END: u32 = 0x30F6;
const KATAKANA_TO_HIRAGANA_OFFSET: u32 = KATAKANA_START - HIRAGANA_START;

const KANJI_ITERATION_MARK: char = '々';

/// Returns true for CJK unified ideographs (including Extension A) and the
/// kanji iteration mark, which always belongs to the kanji run it repeats.
pub fn is_kanji(c: char) -> bool {
    let code = c as u32;
    (0x4E00..=0x9FFF).contains(&code) || (0x3400..=0x4DBF).contains(&code) || c == KANJI_ITERATION_MARK
}

/// Returns true if the text contains at least one kanji.
pub fn has_kanji(text: &str) -> bool {
    text.chars().any(is_kanji)
}

/// Converts a single katakana character to hiragana. Characters outside
/// ァ..ヶ (including the prolonged sound mark ー) are returned unchanged.
pub fn katakana_to_hiragana(c: char) -> char {
    let code = c as u32;
    if (KATAKANA_START..=KATAKANA_CONVERTIBLE_END).contains(&code) {
        char::from_u32(code - KATAKANA_TO_HIRAGANA_OFFSET).unwrap_or(c)
    } else {
        c
    }
}

/// Converts every katakana character in `text` to hiragana.
pub fn to_hiragana(text: &str) -> String {
    text.chars().map(katakana_to_hiragana).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_kanji() {
        assert!(is_kanji('思'));
        assert!(is_kanji('出'));
        assert!(is_kanji('々'));
        assert!(is_kanji('\u{3400}'));
        assert!(!is_kanji('い'));
        assert!(!is_kanji('カ'));
        assert!(!is_kanji('a'));
        assert!(!is_kanji('。'));
    }

    #[test]
    fn test_has_kanji() {
        assert!(has_kanji("思い出"));
        assert!(has_kanji("ドキ胸"));
        assert!(!has_kanji("ありがとう"));
        assert!(!has_kanji(""));
    }

    #[test]
    fn test_to_hiragana() {
        assert_eq!(to_hiragana("オモイデ"), "おもいで");
        assert_eq!(to_hiragana("ヴァイオリン"), "ゔぁいおりん");
        assert_eq!(to_hiragana("ラーメン"), "らーめん");
        assert_eq!(to_hiragana("ひらがな"), "ひらがな");
        assert_eq!(to_hiragana("abc漢字"), "abc漢字");
    }
}

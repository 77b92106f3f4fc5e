use wana_kana::{
    utils::is_char_kanji,
    ConvertJapanese,
};

use crate::core::OkurigoError;

/// Produces the phonetic-only rendering sent alongside a sample sentence.
pub trait Transliterator {
    fn transliterate(&self, text: &str) -> Result<String, OkurigoError>;
}

/// Kana-level adapter: katakana and romaji become hiragana, punctuation
/// passes through. Kanji need a morphological analyzer to read, so any kanji
/// left in the rendering means no phonetic-only form exists and the sentence
/// goes up without one.
#[derive(Debug, Default, Clone, Copy)]
pub struct KanaTransliterator;

impl Transliterator for KanaTransliterator {
    fn transliterate(&self, text: &str) -> Result<String, OkurigoError> {
        let kana = text.to_hiragana();
        if kana.chars().any(is_char_kanji) {
            return Err(OkurigoError::Custom(format!(
                "no kana-only rendering for: {}",
                text
            )));
        }
        Ok(kana)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn katakana_becomes_hiragana() {
        let rendered = KanaTransliterator.transliterate("カタカナ").unwrap();
        assert_eq!(rendered, "かたかな");
    }

    #[test]
    fn hiragana_and_punctuation_pass_through() {
        let rendered = KanaTransliterator.transliterate("えっと。。。はなうたね。。").unwrap();
        assert_eq!(rendered, "えっと。。。はなうたね。。");
    }

    #[test]
    fn kanji_cannot_be_rendered() {
        assert!(KanaTransliterator.transliterate("鼻歌を歌う").is_err());
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(KanaTransliterator.transliterate("").unwrap(), "");
    }
}

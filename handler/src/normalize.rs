//! 入力テキストの正規化

use unicode_normalization::UnicodeNormalization;

const HYPHENS: &[char] = &[
    '\u{02D7}', '\u{058A}', '\u{2010}', '\u{2011}', '\u{2012}', '\u{2013}', '\u{2043}',
    '\u{207B}', '\u{208B}', '\u{2212}',
];

const LONG_VOWELS: &[char] = &['\u{2014}', '\u{2015}', '\u{2500}', '\u{2501}', '\u{30FC}'];

const TILDES: &[char] = &[
    '~', '\u{223C}', '\u{223E}', '\u{301C}', '\u{3030}', '\u{FF5E}',
];

/// 解析前に入力テキストを正規化します。
///
/// 1. NFKC正規化
/// 2. ハイフン類を `-` に、長音記号類を `ー` に統一し、連続する `ー` を1つにまとめる
/// 3. チルダ類を削除する
/// 4. 連続する空白を1つの半角スペースにまとめて前後を削除し、
///    日本語の文字に隣接する空白を削除する
///
/// # 例
///
/// ```
/// # use morph_handler::normalize::normalize;
/// assert_eq!(normalize("ﾊﾝｶｸｶﾅ"), "ハンカクカナ");
/// assert_eq!(normalize("すごーーーい"), "すごーい");
/// assert_eq!(normalize("検索 エンジン 自作 入門"), "検索エンジン自作入門");
/// ```
pub fn normalize(text: &str) -> String {
    let mut unified = String::with_capacity(text.len());
    for c in text.nfkc() {
        let c = if LONG_VOWELS.contains(&c) {
            'ー'
        } else if HYPHENS.contains(&c) {
            '-'
        } else {
            c
        };
        if TILDES.contains(&c) || (c == 'ー' && unified.ends_with('ー')) {
            continue;
        }
        unified.push(c);
    }

    let words: Vec<&str> = unified.split_whitespace().collect();
    let mut out = String::with_capacity(unified.len());
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            let prev = words[i - 1].chars().next_back();
            let next = word.chars().next();
            if !(prev.is_some_and(is_japanese) || next.is_some_and(is_japanese)) {
                out.push(' ');
            }
        }
        out.push_str(word);
    }
    out
}

fn is_japanese(c: char) -> bool {
    matches!(c,
        '\u{3000}'..='\u{303F}' // CJK symbols and punctuation
        | '\u{3040}'..='\u{309F}' // Hiragana
        | '\u{30A0}'..='\u{30FF}' // Katakana
        | '\u{3400}'..='\u{4DBF}'
        | '\u{4E00}'..='\u{9FFF}'
        | '\u{F900}'..='\u{FAFF}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nfkc() {
        assert_eq!(normalize("０１２３４５６７８９"), "0123456789");
        assert_eq!(normalize("ＡＢＣｄｅｆ"), "ABCdef");
        assert_eq!(normalize("ﾊﾝｶｸｶﾅ"), "ハンカクカナ");
    }

    #[test]
    fn test_hyphens_and_long_vowels() {
        assert_eq!(normalize("o₋o"), "o-o");
        assert_eq!(normalize("majika━"), "majikaー");
        assert_eq!(normalize("スーパーーーー"), "スーパー");
    }

    #[test]
    fn test_tildes() {
        assert_eq!(normalize("わ〰い"), "わい");
        assert_eq!(normalize("a~b"), "ab");
    }

    #[test]
    fn test_spaces() {
        assert_eq!(normalize("  　 食べた  "), "食べた");
        assert_eq!(normalize("アルゴリズム C"), "アルゴリズムC");
        assert_eq!(normalize("Coding the Matrix"), "Coding the Matrix");
        assert_eq!(normalize("南 アルプス の 天然水"), "南アルプスの天然水");
    }

    #[test]
    fn test_fullwidth_punctuation_folds_before_spacing() {
        assert_eq!(normalize("Ｈｅｌｌｏ！ Ｗｏｒｌｄ"), "Hello! World");
        assert_eq!(normalize("｢ｱ｣ 本"), "「ア」本");
    }

    #[test]
    fn test_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }
}

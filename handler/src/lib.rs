//! # morph-handler
//!
//! 日本語テキストを形態素解析し、トークンごとの素性をJSONで返すサーバーレス形式のハンドラーです。
//!
//! ## 概要
//!
//! 1回の呼び出しは次の手順で処理されます。
//!
//! 1. 解析器がテキストをBOS/EOS番兵付きのノード連結リストに変換する
//! 2. 番兵を除いたノードを入力順に走査する
//! 3. 各ノードの素性文字列をCSVの1レコードとしてデコードし、スキーマの列名に対応付ける
//! 4. 表層形を加えたレコードの配列をJSONにシリアライズし、`{statusCode, body}` に格納する
//!
//! スキーマ、正規化の有無、ユーザー辞書の有無は [`Variant`] で選択します。
//!
//! ## 使用例
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use morph_handler::{Event, Handler, Variant, VibratoTagger};
//! use vibrato_rkyv::{SystemDictionaryBuilder, Tokenizer};
//!
//! let lexicon_csv = "食べた,0,0,1,動詞,自立,*,*,一段,連用タ接続,食べる,タベタ,タベタ";
//! let matrix_def = "1 1\n0 0 0";
//! let char_def = "DEFAULT 0 1 0";
//! let unk_def = "DEFAULT,0,0,100,名詞,一般,*,*,*,*,*,*,*";
//!
//! let dict = SystemDictionaryBuilder::from_readers(
//!     lexicon_csv.as_bytes(),
//!     matrix_def.as_bytes(),
//!     char_def.as_bytes(),
//!     unk_def.as_bytes(),
//! )?;
//! let tokenizer = Tokenizer::from_inner(dict);
//!
//! let mut handler = Handler::new(VibratoTagger::new(&tokenizer), Variant::Ipadic);
//! let response = handler.handle(&Event::new("食べた"))?;
//! assert_eq!(response.status_code, 200);
//! assert!(response.body.contains(r#""surface": "食べた""#));
//! # Ok(())
//! # }
//! ```

/// 解析器の設定
pub mod config;

/// エラー型の定義
pub mod errors;

/// 素性文字列のデコーダ
pub mod feature;

/// ユーザー辞書のローカル実体化
pub mod fetch;

/// イベントの処理とレスポンスの組み立て
pub mod handler;

/// ノードの連結リストと走査
pub mod node;

/// テキスト正規化
pub mod normalize;

/// 素性スキーマ
pub mod schema;

/// 形態素解析器
pub mod tagger;

#[cfg(test)]
mod tests;

// Re-exports
pub use config::{TaggerConfig, UserDicLocation};
pub use errors::{HandlerError, Result};
pub use handler::{analyze, Event, Handler, Response};
pub use schema::{FeatureRecord, Token, Variant};
pub use tagger::{Tagger, VibratoTagger};

/// このライブラリのバージョン番号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

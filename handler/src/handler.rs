//! イベントを受け取り、解析結果をレスポンスとして返すハンドラー
//!
//! 1回の呼び出しで、入力テキストの解析、各トークンの素性のデコード、
//! JSONへのシリアライズを行います。どのトークンのデコードに失敗しても
//! 呼び出し全体が失敗し、部分的な結果は返しません。

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::TaggerConfig;
use crate::errors::Result;
use crate::feature::decode_record;
use crate::node::iterate_tokens;
use crate::normalize::normalize;
use crate::schema::{
    FeatureRecord, IpadicFeatures, IpadicUserdicFeatures, Token, UnidicFeatures, Variant,
};
use crate::tagger::{load_tokenizer, Tagger, VibratoTagger};

/// 成功時のステータスコード
pub const STATUS_OK: u16 = 200;

/// ハンドラーへの入力イベント
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// 解析対象のテキスト
    pub body: String,
}

impl Event {
    /// テキストから新しいイベントを作成します。
    pub fn new<S: Into<String>>(body: S) -> Self {
        Self { body: body.into() }
    }

    /// コマンドラインから与えられたデータをイベントとして解釈します。
    ///
    /// - JSONオブジェクトの場合は、`body` フィールドを持つイベントとして読み込みます。
    /// - JSON文字列の場合は、デコードした文字列を本文とします。
    /// - それ以外の場合は、データそのものを本文とします。
    ///
    /// # エラー
    ///
    /// JSONオブジェクトに `body` フィールドがない場合にエラーを返します。
    pub fn from_data(data: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(data) {
            Ok(value @ Value::Object(_)) => Ok(serde_json::from_value(value)?),
            Ok(Value::String(body)) => Ok(Self { body }),
            _ => Ok(Self::new(data)),
        }
    }
}

/// ハンドラーのレスポンス
///
/// `body` にはトークンレコードの配列をJSONとしてシリアライズした文字列が入ります。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// HTTPステータスコード
    pub status_code: u16,

    /// JSON文字列
    pub body: String,
}

/// テキストを解析し、トークンレコードを入力順に返します。
///
/// # エラー
///
/// 解析に失敗した場合、またはいずれかのトークンの素性のデコードに失敗した場合に
/// エラーを返します。
pub fn analyze<F, T>(tagger: &mut T, text: &str) -> Result<Vec<Token<F>>>
where
    F: FeatureRecord,
    T: Tagger + ?Sized,
{
    let chain = tagger.parse_to_node(text)?;
    iterate_tokens(chain)
        .map(|(surface, feature)| -> Result<Token<F>> {
            Ok(Token {
                surface,
                features: decode_record(&feature)?,
            })
        })
        .collect()
}

/// 解析器とバリアントを保持するハンドラー
///
/// 解析器は構築時に一度だけ用意され、以降の呼び出しで再利用されます。
pub struct Handler<T> {
    tagger: T,
    variant: Variant,
}

impl Handler<VibratoTagger> {
    /// 設定から辞書を読み込み、ハンドラーを構築します。
    ///
    /// # エラー
    ///
    /// 辞書やユーザー辞書の読み込みに失敗した場合にエラーを返します。
    pub fn from_config(config: &TaggerConfig, variant: Variant) -> Result<Self> {
        let tokenizer = load_tokenizer(config, variant)?;
        Ok(Self::new(VibratoTagger::new(&tokenizer), variant))
    }
}

impl<T> Handler<T>
where
    T: Tagger,
{
    /// 解析器とバリアントからハンドラーを作成します。
    pub fn new(tagger: T, variant: Variant) -> Self {
        Self { tagger, variant }
    }

    /// ハンドラーのバリアント
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// 解析器への参照
    pub fn tagger(&self) -> &T {
        &self.tagger
    }

    /// イベントを処理します。
    ///
    /// 正規化を行うバリアントでは、解析前に入力テキストを正規化します。
    pub fn handle(&mut self, event: &Event) -> Result<Response> {
        let text = if self.variant.normalizes() {
            Cow::Owned(normalize(&event.body))
        } else {
            Cow::Borrowed(event.body.as_str())
        };
        log::debug!("text: {}", text);

        let body = match self.variant {
            Variant::Unidic => self.render::<UnidicFeatures>(&text)?,
            Variant::Ipadic => self.render::<IpadicFeatures>(&text)?,
            Variant::IpadicUserdic => self.render::<IpadicUserdicFeatures>(&text)?,
        };

        Ok(Response {
            status_code: STATUS_OK,
            body,
        })
    }

    fn render<F>(&mut self, text: &str) -> Result<String>
    where
        F: FeatureRecord,
    {
        let out: Vec<Token<F>> = analyze(&mut self.tagger, text)?;
        log::debug!("out: {:?}", out);
        Ok(serde_json::to_string_pretty(&out)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_from_data() {
        assert_eq!(
            Event::from_data(r#"{"body": "食べた"}"#).unwrap(),
            Event::new("食べた")
        );
        assert_eq!(Event::from_data(r#""食べた""#).unwrap(), Event::new("食べた"));
        assert_eq!(Event::from_data("食べた").unwrap(), Event::new("食べた"));
        assert_eq!(Event::from_data("123").unwrap(), Event::new("123"));
        assert!(Event::from_data(r#"{"text": "食べた"}"#).is_err());
    }

    #[test]
    fn test_response_envelope() {
        let response = Response {
            status_code: STATUS_OK,
            body: "[]".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&response).unwrap(),
            r#"{"statusCode":200,"body":"[]"}"#
        );
    }
}

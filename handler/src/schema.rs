//! 素性スキーマと固定形状のトークンレコード
//!
//! 形態素解析器が出力する素性文字列の列構成は辞書フォーマットごとに固定されています。
//! このモジュールは、各辞書フォーマットの列名リストと、それに対応する
//! 型付きレコードを定義します。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{HandlerError, Result};

/// 素性文字列の各列に名前付きで対応する固定形状のレコード
///
/// `COLUMNS` の順序は解析器が出力するフィールドの順序と完全に一致していなければなりません。
pub trait FeatureRecord: Sized + Serialize + fmt::Debug {
    /// 列名のリスト（出力順）
    const COLUMNS: &'static [&'static str];

    /// フィールド値の列からレコードを構築します。
    ///
    /// # エラー
    ///
    /// フィールド数が [`Self::COLUMNS`] の長さと一致しない場合にエラーを返します。
    fn from_fields(fields: Vec<String>) -> Result<Self>;
}

macro_rules! feature_record {
    (
        $(#[$meta:meta])*
        $name:ident { $( $field:ident => $column:literal ),* $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name {
            $(
                #[serde(rename = $column)]
                pub $field: String,
            )*
        }

        impl FeatureRecord for $name {
            const COLUMNS: &'static [&'static str] = &[$($column),*];

            fn from_fields(fields: Vec<String>) -> Result<Self> {
                if fields.len() != Self::COLUMNS.len() {
                    return Err(HandlerError::invalid_format(
                        "fields",
                        format!(
                            "{} expects {} fields, but got {}",
                            stringify!($name),
                            Self::COLUMNS.len(),
                            fields.len(),
                        ),
                    ));
                }
                let mut fields = fields.into_iter();
                Ok(Self {
                    $( $field: fields.next().unwrap_or_default(), )*
                })
            }
        }
    };
}

feature_record! {
    /// IPADIC形式の素性
    ///
    /// `品詞,品詞細分類1,品詞細分類2,品詞細分類3,活用型,活用形,原形,読み,発音`
    IpadicFeatures {
        pos1 => "pos1",
        pos2 => "pos2",
        pos3 => "pos3",
        pos4 => "pos4",
        c_type => "cType",
        c_form => "cForm",
        base_form => "baseForm",
        kana => "kana",
        pron => "pron",
    }
}

feature_record! {
    /// IPADIC形式にユーザー辞書の列を追加した素性
    IpadicUserdicFeatures {
        pos1 => "pos1",
        pos2 => "pos2",
        pos3 => "pos3",
        pos4 => "pos4",
        c_type => "cType",
        c_form => "cForm",
        base_form => "baseForm",
        kana => "kana",
        pron => "pron",
        user_category => "userCategory",
        user_id => "userId",
    }
}

feature_record! {
    /// UniDic形式の素性（26列）
    UnidicFeatures {
        pos1 => "pos1",
        pos2 => "pos2",
        pos3 => "pos3",
        pos4 => "pos4",
        c_type => "cType",
        c_form => "cForm",
        l_form => "lForm",
        lemma => "lemma",
        orth => "orth",
        pron => "pron",
        orth_base => "orthBase",
        pron_base => "pronBase",
        goshu => "goshu",
        i_type => "iType",
        i_form => "iForm",
        f_type => "fType",
        f_form => "fForm",
        kana => "kana",
        kana_base => "kanaBase",
        form => "form",
        form_base => "formBase",
        i_con_type => "iConType",
        f_con_type => "fConType",
        a_type => "aType",
        a_con_type => "aConType",
        a_mod_type => "aModType",
    }
}

/// IPADIC形式の列名
pub const FEATURES_IPADIC: &[&str] = <IpadicFeatures as FeatureRecord>::COLUMNS;

/// ユーザー辞書エントリがIPADIC列の後ろに追加する列名
pub const FEATURES_USERDIC: &[&str] = &["userCategory", "userId"];

/// UniDic形式の列名
pub const FEATURES_UDIC: &[&str] = <UnidicFeatures as FeatureRecord>::COLUMNS;

/// 解析済みトークン1つ分のレコード
///
/// 表層形が先頭に、続いてスキーマの列が順番通りにシリアライズされます。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token<F> {
    /// 表層形
    pub surface: String,

    /// 素性
    #[serde(flatten)]
    pub features: F,
}

/// ハンドラーのバリアント
///
/// 辞書フォーマット（スキーマ）と、テキスト正規化・ユーザー辞書読み込みの有無を決定します。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Variant {
    /// UniDic形式。正規化なし、ユーザー辞書なし。
    #[default]
    Unidic,
    /// IPADIC形式。正規化あり、ユーザー辞書なし。
    Ipadic,
    /// IPADIC形式 + ユーザー辞書列。正規化あり、ユーザー辞書必須。
    IpadicUserdic,
}

impl Variant {
    /// 解析前に入力テキストを正規化するかどうか
    pub const fn normalizes(self) -> bool {
        matches!(self, Self::Ipadic | Self::IpadicUserdic)
    }

    /// ユーザー辞書を読み込むかどうか
    pub const fn loads_user_dictionary(self) -> bool {
        matches!(self, Self::IpadicUserdic)
    }

    /// このバリアントが使用する列名
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Self::Unidic => UnidicFeatures::COLUMNS,
            Self::Ipadic => IpadicFeatures::COLUMNS,
            Self::IpadicUserdic => IpadicUserdicFeatures::COLUMNS,
        }
    }

    /// バリアント名
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unidic => "unidic",
            Self::Ipadic => "ipadic",
            Self::IpadicUserdic => "ipadic-userdic",
        }
    }
}

impl FromStr for Variant {
    type Err = &'static str;

    fn from_str(variant: &str) -> Result<Self, Self::Err> {
        match variant {
            "unidic" => Ok(Self::Unidic),
            "ipadic" => Ok(Self::Ipadic),
            "ipadic-userdic" => Ok(Self::IpadicUserdic),
            _ => Err("Could not parse a variant"),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

//! 形態素解析器
//!
//! このモジュールは、テキストをノードの連結リストに変換する [`Tagger`] トレイトと、
//! vibrato-rkyvのトークナイザーを用いたその実装を提供します。
//! 辞書ディレクトリからのトークナイザーの構築もここで行います。

use std::fs::File;
use std::path::Path;

use vibrato_rkyv::dictionary::{DictionaryInner, SystemDictionaryBuilder};
use vibrato_rkyv::tokenizer::worker::Worker;
use vibrato_rkyv::{CacheStrategy, Dictionary, LoadMode, Tokenizer};

use crate::config::TaggerConfig;
use crate::errors::{HandlerError, Result};
use crate::fetch;
use crate::node::NodeChain;
use crate::schema::Variant;

/// zstd圧縮されたコンパイル済み辞書のファイル名
pub const SYSTEM_DIC_ZSTD: &str = "system.dic.zst";
/// コンパイル済み辞書のファイル名
pub const SYSTEM_DIC: &str = "system.dic";
/// 語彙ファイルのファイル名
pub const LEXICON_CSV: &str = "lex.csv";
/// 連接コスト定義ファイルのファイル名
pub const MATRIX_DEF: &str = "matrix.def";
/// 文字定義ファイルのファイル名
pub const CHAR_DEF: &str = "char.def";
/// 未知語定義ファイルのファイル名
pub const UNK_DEF: &str = "unk.def";

/// テキストを形態素ノードの連結リストに変換する解析器
///
/// 返される連結リストは、BOS番兵で始まりEOS番兵で終わらなければなりません。
pub trait Tagger {
    /// テキストを解析します。
    fn parse_to_node(&mut self, text: &str) -> Result<NodeChain>;
}

/// vibrato-rkyvのワーカーによる [`Tagger`] の実装
pub struct VibratoTagger {
    worker: Worker,
}

impl VibratoTagger {
    /// トークナイザーから新しいワーカーを作成します。
    pub fn new(tokenizer: &Tokenizer) -> Self {
        Self {
            worker: tokenizer.new_worker(),
        }
    }
}

impl Tagger for VibratoTagger {
    fn parse_to_node(&mut self, text: &str) -> Result<NodeChain> {
        self.worker.reset_sentence(text);
        self.worker.tokenize();
        Ok(NodeChain::from_tokens(
            self.worker
                .token_iter()
                .map(|t| (t.surface().to_string(), t.feature().to_string())),
        ))
    }
}

/// 設定に従ってトークナイザーを構築します。
///
/// ユーザー辞書を読み込むバリアントでは、辞書ディレクトリ内のソースファイル
/// （`lex.csv`、`matrix.def`、`char.def`、`unk.def`）からシステム辞書を構築し、
/// ユーザー辞書を追加します。リモートのユーザー辞書は一時ファイルを経由して読み込まれ、
/// 一時ファイルはこの関数から戻る前に削除されます。
///
/// それ以外のバリアントでは、`system.dic.zst`、`system.dic`、ソースファイルの順に
/// 最初に見つかったものを読み込みます。
///
/// # エラー
///
/// 辞書ディレクトリが存在しない場合、必要なファイルが見つからない場合、
/// または辞書の読み込みに失敗した場合にエラーを返します。
pub fn load_tokenizer(config: &TaggerConfig, variant: Variant) -> Result<Tokenizer> {
    let dicdir = config.dicdir.as_path();
    if !dicdir.is_dir() {
        return Err(HandlerError::invalid_argument(
            "dicdir",
            format!("{} is not a directory", dicdir.display()),
        ));
    }

    if !variant.loads_user_dictionary() {
        if let Some(userdic) = &config.userdic {
            log::warn!("{} does not load user dictionaries; ignoring {}", variant, userdic);
        }
        return load_system_only(dicdir);
    }

    let location = config.userdic.as_ref().ok_or_else(|| {
        HandlerError::invalid_argument("userdic", format!("{variant} requires a user dictionary"))
    })?;
    let dict = build_from_sources(dicdir)?;
    let dict = fetch::with_local_copy(location, config.userdic_sha256.as_deref(), |path| {
        log::info!("Loading the user dictionary from {}", location);
        Ok(dict.reset_user_lexicon_from_reader(Some(File::open(path)?))?)
    })?;
    Ok(Tokenizer::from_inner(dict))
}

fn load_system_only(dicdir: &Path) -> Result<Tokenizer> {
    let zstd_path = dicdir.join(SYSTEM_DIC_ZSTD);
    if zstd_path.is_file() {
        log::info!("Loading the dictionary from {}", zstd_path.display());
        let dict = Dictionary::from_zstd(zstd_path, CacheStrategy::GlobalCache)?;
        return Ok(Tokenizer::new(dict));
    }

    let path = dicdir.join(SYSTEM_DIC);
    if path.is_file() {
        log::info!("Loading the dictionary from {}", path.display());
        let dict = Dictionary::from_path(path, LoadMode::Validate)?;
        return Ok(Tokenizer::new(dict));
    }

    Ok(Tokenizer::from_inner(build_from_sources(dicdir)?))
}

fn build_from_sources(dicdir: &Path) -> Result<DictionaryInner> {
    let open = |name: &str| {
        let path = dicdir.join(name);
        File::open(&path).map_err(|e| {
            HandlerError::invalid_argument("dicdir", format!("{}: {}", path.display(), e))
        })
    };

    log::info!("Compiling the system dictionary in {}", dicdir.display());
    let dict = SystemDictionaryBuilder::from_readers(
        open(LEXICON_CSV)?,
        open(MATRIX_DEF)?,
        open(CHAR_DEF)?,
        open(UNK_DEF)?,
    )?;
    Ok(dict)
}

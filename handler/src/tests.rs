//! ハンドラーのテストモジュール群
//!
//! 解析器からレスポンスまでを通した動作と、辞書ディレクトリからの読み込みを検証します。

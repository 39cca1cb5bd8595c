//! 形態素ノードの連結リストと、その走査規約
//!
//! 解析結果は、文頭（BOS）の番兵ノードで始まり文末（EOS）の番兵ノードで終わる
//! 前方連結リストとして表現されます。[`iterate_tokens`] は番兵を除いたトークンだけを
//! 入力順に取り出します。

/// BOS/EOS番兵ノードの素性
pub const BOS_EOS_FEATURE: &str = "BOS/EOS,*,*,*,*,*,*,*,*";

/// ノードの種類
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeStat {
    /// 通常のトークン
    Normal,
    /// 文頭の番兵
    Bos,
    /// 文末の番兵
    Eos,
}

/// 連結リスト内のノード
#[derive(Debug)]
pub struct Node {
    /// 表層形
    pub surface: String,
    /// 素性文字列（CSVの1レコード）
    pub feature: String,
    /// ノードの種類
    pub stat: NodeStat,
    next: Option<Box<Node>>,
}

impl Node {
    /// 後続ノードを持たない新しいノードを作成します。
    pub fn new<S, F>(surface: S, feature: F, stat: NodeStat) -> Self
    where
        S: Into<String>,
        F: Into<String>,
    {
        Self {
            surface: surface.into(),
            feature: feature.into(),
            stat,
            next: None,
        }
    }

    /// 後続ノードへの参照を取得します。
    #[inline(always)]
    pub fn next(&self) -> Option<&Node> {
        self.next.as_deref()
    }

    fn sentinel(stat: NodeStat) -> Self {
        Self::new("", BOS_EOS_FEATURE, stat)
    }
}

/// 解析器が出力するノードの連結リスト
///
/// 先頭ノードから `next` をたどることで全ノードに到達できます。
#[derive(Debug, Default)]
pub struct NodeChain {
    head: Option<Box<Node>>,
}

impl NodeChain {
    /// 先頭ノードから連結リストを作成します。
    pub fn from_head(head: Node) -> Self {
        Self {
            head: Some(Box::new(head)),
        }
    }

    /// ノード列を順番通りに連結します。
    pub fn from_nodes<I>(nodes: I) -> Self
    where
        I: IntoIterator<Item = Node>,
        I::IntoIter: DoubleEndedIterator,
    {
        let head = nodes.into_iter().rev().fold(None, |next, mut node: Node| {
            node.next = next;
            Some(Box::new(node))
        });
        Self { head }
    }

    /// `(表層形, 素性)` の列をBOS/EOS番兵で挟んだ連結リストを作成します。
    ///
    /// 空の列からは番兵2つだけのリストが得られます。
    pub fn from_tokens<I, S, F>(tokens: I) -> Self
    where
        I: IntoIterator<Item = (S, F)>,
        S: Into<String>,
        F: Into<String>,
    {
        let mut nodes = vec![Node::sentinel(NodeStat::Bos)];
        nodes.extend(
            tokens
                .into_iter()
                .map(|(surface, feature)| Node::new(surface, feature, NodeStat::Normal)),
        );
        nodes.push(Node::sentinel(NodeStat::Eos));
        Self::from_nodes(nodes)
    }

    /// 先頭ノードへの参照を取得します。
    pub fn head(&self) -> Option<&Node> {
        self.head.as_deref()
    }
}

impl Drop for NodeChain {
    fn drop(&mut self) {
        let mut cur = self.head.take();
        while let Some(mut node) = cur {
            cur = node.next.take();
        }
    }
}

/// 番兵を除いたトークンを入力順に取り出すイテレータ
///
/// [`iterate_tokens`] によって生成されます。連結リストを消費しながら前方にのみ進み、
/// 再開することはできません。
pub struct Tokens {
    cursor: Option<Box<Node>>,
}

impl Iterator for Tokens {
    type Item = (String, String);

    fn next(&mut self) -> Option<Self::Item> {
        let mut node = self.cursor.take()?;
        // The node without a successor is the EOS sentinel.
        let next = node.next.take()?;
        self.cursor = Some(next);
        Some((
            std::mem::take(&mut node.surface),
            std::mem::take(&mut node.feature),
        ))
    }
}

impl Drop for Tokens {
    fn drop(&mut self) {
        let mut cur = self.cursor.take();
        while let Some(mut node) = cur {
            cur = node.next.take();
        }
    }
}

impl std::iter::FusedIterator for Tokens {}

/// 連結リストを走査し、`(表層形, 素性)` を入力順に返します。
///
/// 先頭ノード（BOS）は無条件に読み飛ばし、以降は後続ノードを持つノードだけを返します。
/// つまり末尾のEOSは返されません。
pub fn iterate_tokens(mut chain: NodeChain) -> Tokens {
    let cursor = chain.head.take().and_then(|mut bos| bos.next.take());
    Tokens { cursor }
}

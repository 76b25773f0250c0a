use crate::renderer::GlyphBlock;

/// スクロール可能な 1 行
///
/// `owner` はその行を描画したノートのインデックス (区切り行は `None`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatRow {
    pub owner: Option<usize>,
    pub text: String,
}

impl FlatRow {
    fn spacer() -> Self {
        Self {
            owner: None,
            text: String::new(),
        }
    }
}

/// 全ブロックと区切り行を 1 列に並べたもの
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatLayout {
    rows: Vec<FlatRow>,
    /// ノートごとの最初の行 (直前の区切り行ではない)
    note_start_rows: Vec<usize>,
}

impl FlatLayout {
    /// 各ブロックの後ろに区切り行を 1 行ずつ挟んで並べる
    ///
    /// 空のブロックは高さ 0 として扱い、区切り行だけが残る
    pub fn build<'a, I>(blocks: I) -> Self
    where
        I: IntoIterator<Item = &'a GlyphBlock>,
    {
        let mut rows = Vec::new();
        let mut note_start_rows = Vec::new();

        for (index, block) in blocks.into_iter().enumerate() {
            note_start_rows.push(rows.len());
            rows.extend(block.lines().iter().map(|line| FlatRow {
                owner: Some(index),
                text: line.clone(),
            }));
            rows.push(FlatRow::spacer());
        }

        Self {
            rows,
            note_start_rows,
        }
    }

    pub fn rows(&self) -> &[FlatRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn note_count(&self) -> usize {
        self.note_start_rows.len()
    }

    pub fn note_start_row(&self, note: usize) -> Option<usize> {
        self.note_start_rows.get(note).copied()
    }

    /// ノートのブロックの行数 (区切り行は含まない)
    pub fn note_height(&self, note: usize) -> Option<usize> {
        let start = self.note_start_row(note)?;
        let next = self
            .note_start_row(note + 1)
            .unwrap_or(self.rows.len());
        Some(next - start - 1)
    }
}

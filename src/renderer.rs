use std::collections::HashMap;

use figlet_rs::FIGfont;
use tracing::warn;

use crate::error::RenderError;

/// 1 つのノートを描画した複数行のブロック
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GlyphBlock {
    lines: Vec<String>,
}

impl GlyphBlock {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// 描画に失敗したときの 1 行フォールバック
    pub fn plain(text: &str) -> Self {
        Self {
            lines: vec![text.to_string()],
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn height(&self) -> usize {
        self.lines.len()
    }
}

/// テキストをブロックアートに変換する
pub trait GlyphRenderer {
    fn render(&self, text: &str) -> Result<GlyphBlock, RenderError>;
}

/// figlet の standard フォントで描画する
pub struct FigletRenderer {
    font: FIGfont,
}

impl FigletRenderer {
    pub fn standard() -> Result<Self, RenderError> {
        let font = FIGfont::standard().map_err(RenderError::Font)?;
        Ok(Self { font })
    }
}

impl GlyphRenderer for FigletRenderer {
    fn render(&self, text: &str) -> Result<GlyphBlock, RenderError> {
        let figure = self
            .font
            .convert(text)
            .ok_or_else(|| RenderError::Unrenderable(text.to_string()))?;
        let lines: Vec<String> = figure.to_string().lines().map(str::to_string).collect();
        if lines.is_empty() {
            return Err(RenderError::Unrenderable(text.to_string()));
        }
        Ok(GlyphBlock::new(lines))
    }
}

/// ノート本文をキーにしたブロックのキャッシュ
///
/// 一覧から消えたノートのエントリは `blocks` のたびに捨てる
pub struct BlockCache {
    renderer: Box<dyn GlyphRenderer>,
    cache: HashMap<String, GlyphBlock>,
}

impl BlockCache {
    pub fn new(renderer: Box<dyn GlyphRenderer>) -> Self {
        Self {
            renderer,
            cache: HashMap::new(),
        }
    }

    /// ノートと同じ順序でブロックを返す
    pub fn blocks(&mut self, notes: &[String]) -> Vec<&GlyphBlock> {
        for note in notes {
            if !self.cache.contains_key(note) {
                let block = self.renderer.render(note).unwrap_or_else(|err| {
                    warn!(error = %err, "falling back to plain text");
                    GlyphBlock::plain(note)
                });
                self.cache.insert(note.clone(), block);
            }
        }
        self.cache.retain(|key, _| notes.contains(key));
        notes.iter().map(|note| &self.cache[note]).collect()
    }

    #[cfg(test)]
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

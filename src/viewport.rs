use crate::layout::{FlatLayout, FlatRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// 表示窓の位置と選択中のノート
///
/// 不変条件:
/// - `scroll <= max(0, layout.len() - height)` (変更のたびにクランプ)
/// - ノートが空なら `selected == None`、それ以外は `selected < note_count`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    scroll: usize,
    selected: Option<usize>,
    height: usize,
}

impl Viewport {
    pub fn new(note_count: usize, height: usize) -> Self {
        Self {
            scroll: 0,
            selected: if note_count > 0 { Some(0) } else { None },
            height,
        }
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    #[cfg(test)]
    pub fn height(&self) -> usize {
        self.height
    }

    fn max_scroll(&self, layout: &FlatLayout) -> usize {
        layout.len().saturating_sub(self.height)
    }

    fn clamp(&mut self, layout: &FlatLayout) {
        self.scroll = self.scroll.min(self.max_scroll(layout));
    }

    /// 現在見えている行を返す
    pub fn compute_window<'a>(&mut self, layout: &'a FlatLayout) -> &'a [FlatRow] {
        self.clamp(layout);
        let rows = layout.rows();
        let end = (self.scroll + self.height).min(rows.len());
        &rows[self.scroll.min(end)..end]
    }

    /// 選択中ノートの先頭行が窓に入るようにスクロールする
    ///
    /// 窓の上なら先頭行まで戻し、窓の下なら先頭行が最下段に来るまで送る。
    /// 窓以上の高さのブロックは先頭行を窓の最上段に合わせる
    pub fn ensure_visible(&mut self, layout: &FlatLayout) {
        let Some(note) = self.selected else {
            self.clamp(layout);
            return;
        };
        let (Some(start), Some(block_height)) =
            (layout.note_start_row(note), layout.note_height(note))
        else {
            self.clamp(layout);
            return;
        };
        if self.height == 0 {
            return;
        }

        if start < self.scroll {
            self.scroll = start;
        } else if start >= self.scroll + self.height {
            self.scroll = start - self.height + 1;
        }
        if block_height >= self.height {
            self.scroll = start;
        }
        self.clamp(layout);
    }

    /// 1 画面分スクロールする (選択は動かさない)
    pub fn page_scroll(&mut self, direction: ScrollDirection, layout: &FlatLayout) {
        self.scroll = match direction {
            ScrollDirection::Up => self.scroll.saturating_sub(self.height),
            ScrollDirection::Down => self.scroll.saturating_add(self.height),
        };
        self.clamp(layout);
    }

    /// 端末サイズが変わったときに呼ぶ
    ///
    /// 高さが同じなら何もしない (ページスクロールを打ち消さないため)
    pub fn resize(&mut self, height: usize, layout: &FlatLayout) {
        if height == self.height {
            return;
        }
        self.height = height;
        self.ensure_visible(layout);
    }

    pub fn select_prev(&mut self, layout: &FlatLayout) {
        if let Some(selected) = self.selected {
            self.selected = Some(selected.saturating_sub(1));
            self.ensure_visible(layout);
        }
    }

    pub fn select_next(&mut self, layout: &FlatLayout) {
        let count = layout.note_count();
        if let Some(selected) = self.selected
            && count > 0
        {
            self.selected = Some((selected + 1).min(count - 1));
            self.ensure_visible(layout);
        }
    }

    /// ノートの増減後に選択を範囲内へ戻す
    ///
    /// `target` が範囲外なら最後のノートを選ぶ。ノートが空なら選択なし
    pub fn select_clamped(&mut self, target: usize, layout: &FlatLayout) {
        let count = layout.note_count();
        self.selected = if count == 0 {
            None
        } else {
            Some(target.min(count - 1))
        };
        self.ensure_visible(layout);
    }
}

use std::time::{Duration, Instant};

use termion::event::Key;
use tracing::{debug, warn};

use crate::{
    highlight::Highlight,
    input::Action,
    layout::{FlatLayout, FlatRow},
    notes::NoteList,
    renderer::BlockCache,
    store::NoteStore,
    viewport::{ScrollDirection, Viewport},
};

/// ループを続けるか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// 1 フレームの描画に必要なもの
pub struct Frame<'a> {
    pub rows: &'a [FlatRow],
    pub selected: Option<usize>,
    pub highlight: bool,
    pub input: &'a str,
    pub status: Option<&'a str>,
    pub note_count: usize,
}

/// 対話セッション中の全状態
///
/// 描画ループが所有し、キー入力のたびに `handle` で更新する
pub struct Session {
    notes: NoteList,
    /// 未確定の入力
    input: String,
    viewport: Viewport,
    highlight: Highlight,
    /// 保存失敗などの一時メッセージ
    status: Option<String>,
    layout: FlatLayout,
}

impl Session {
    pub fn new(
        notes: NoteList,
        blocks: &mut BlockCache,
        viewport_height: usize,
        now: Instant,
        decay: Duration,
    ) -> Self {
        let viewport = Viewport::new(notes.len(), viewport_height);
        let mut session = Self {
            notes,
            input: String::new(),
            viewport,
            highlight: Highlight::new(now, decay),
            status: None,
            layout: FlatLayout::default(),
        };
        session.relayout(blocks);
        session
    }

    /// ストアから読み込んで開始する
    ///
    /// 読み込みに失敗しても空の一覧で続行する
    pub fn load(
        store: &dyn NoteStore,
        blocks: &mut BlockCache,
        viewport_height: usize,
        now: Instant,
        decay: Duration,
    ) -> Self {
        let (notes, status) = match store.load() {
            Ok(lines) => (NoteList::from_lines(lines), None),
            Err(err) => {
                warn!(error = %err, "starting with an empty note list");
                (NoteList::new(), Some(format!("Load failed: {}", err)))
            }
        };
        let mut session = Self::new(notes, blocks, viewport_height, now, decay);
        session.status = status;
        session
    }

    pub fn notes(&self) -> &NoteList {
        &self.notes
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn layout(&self) -> &FlatLayout {
        &self.layout
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// ノート一覧からレイアウトを作り直す
    ///
    /// スクロール位置のクランプは `frame` で行う
    pub fn relayout(&mut self, blocks: &mut BlockCache) {
        self.layout = FlatLayout::build(blocks.blocks(self.notes.as_slice()));
    }

    pub fn resize(&mut self, viewport_height: usize) {
        self.viewport.resize(viewport_height, &self.layout);
    }

    pub fn frame(&mut self, now: Instant) -> Frame<'_> {
        Frame {
            rows: self.viewport.compute_window(&self.layout),
            selected: self.viewport.selected(),
            highlight: self.highlight.is_visible(now),
            input: &self.input,
            status: self.status.as_deref(),
            note_count: self.notes.len(),
        }
    }

    /// キー入力を 1 つ処理する
    pub fn handle_key(
        &mut self,
        key: Key,
        blocks: &mut BlockCache,
        store: &dyn NoteStore,
        now: Instant,
    ) -> Flow {
        self.highlight.record_activity(now);
        self.handle(Action::from_key(key), blocks, store)
    }

    pub fn handle(
        &mut self,
        action: Action,
        blocks: &mut BlockCache,
        store: &dyn NoteStore,
    ) -> Flow {
        debug!(?action, "handle");
        match action {
            Action::NavigateUp => self.viewport.select_prev(&self.layout),
            Action::NavigateDown => self.viewport.select_next(&self.layout),
            Action::PageUp => self.viewport.page_scroll(ScrollDirection::Up, &self.layout),
            Action::PageDown => self.viewport.page_scroll(ScrollDirection::Down, &self.layout),
            Action::DeleteNote => self.delete_selected(blocks, store),
            Action::Backspace => {
                self.input.pop();
            }
            Action::Char(ch) => self.input.push(ch),
            Action::Submit => self.submit(blocks, store),
            Action::Quit => return Flow::Quit,
            Action::Ignore => {}
        }
        Flow::Continue
    }

    fn delete_selected(&mut self, blocks: &mut BlockCache, store: &dyn NoteStore) {
        let Some(selected) = self.viewport.selected() else {
            return;
        };
        if self.notes.remove(selected).is_none() {
            return;
        }
        self.persist(store);
        self.relayout(blocks);
        self.viewport.select_clamped(selected, &self.layout);
    }

    fn submit(&mut self, blocks: &mut BlockCache, store: &dyn NoteStore) {
        let Some(index) = self.notes.push(&self.input) else {
            return;
        };
        self.input.clear();
        self.persist(store);
        self.relayout(blocks);
        self.viewport.select_clamped(index, &self.layout);
    }

    /// 書き込みに失敗してもメモリ上の変更は保持する
    fn persist(&mut self, store: &dyn NoteStore) {
        match store.save(self.notes.as_slice()) {
            Ok(()) => self.status = None,
            Err(err) => {
                warn!(error = %err, "keeping unsaved changes in memory");
                self.status = Some(format!("Save failed: {}", err));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::fake::FakeRenderer;
    use crate::store::FileStore;
    use tempfile::tempdir;

    const DECAY: Duration = Duration::from_secs(2);

    fn cache(height: usize) -> BlockCache {
        BlockCache::new(Box::new(FakeRenderer::new(height)))
    }

    fn session_with(notes: &[&str], blocks: &mut BlockCache, height: usize) -> Session {
        Session::new(
            NoteList::from_lines(notes),
            blocks,
            height,
            Instant::now(),
            DECAY,
        )
    }

    fn type_text(session: &mut Session, text: &str, blocks: &mut BlockCache, store: &FileStore) {
        for ch in text.chars() {
            session.handle(Action::Char(ch), blocks, store);
        }
    }

    #[test]
    fn test_submit_into_empty_store() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("notes.txt"));
        let mut blocks = cache(3);
        let mut session = Session::load(&store, &mut blocks, 10, Instant::now(), DECAY);
        assert_eq!(session.viewport().selected(), None);

        type_text(&mut session, "Buy milk", &mut blocks, &store);
        session.handle(Action::Submit, &mut blocks, &store);

        assert_eq!(session.notes().as_slice(), &["Buy milk"]);
        assert_eq!(session.viewport().selected(), Some(0));
        assert_eq!(session.input(), "");
        let content = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(content, "Buy milk\n");
    }

    #[test]
    fn test_submit_trims_input() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("notes.txt"));
        let mut blocks = cache(1);
        let mut session = session_with(&["a"], &mut blocks, 10);

        type_text(&mut session, "  padded  ", &mut blocks, &store);
        session.handle(Action::Submit, &mut blocks, &store);

        assert_eq!(session.notes().get(1), Some("padded"));
        assert_eq!(session.viewport().selected(), Some(1));
    }

    #[test]
    fn test_submit_blank_input_is_noop() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("notes.txt"));
        let mut blocks = cache(1);
        let mut session = session_with(&[], &mut blocks, 10);

        type_text(&mut session, "   ", &mut blocks, &store);
        session.handle(Action::Submit, &mut blocks, &store);

        assert!(session.notes().is_empty());
        assert_eq!(session.input(), "   ");
        assert_eq!(session.viewport().selected(), None);
        // 保存もしない
        assert!(!store.path().exists());
    }

    #[test]
    fn test_delete_last_note() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("notes.txt"));
        let mut blocks = cache(2);
        let mut session = session_with(&["one", "two", "three"], &mut blocks, 10);
        session.handle(Action::NavigateDown, &mut blocks, &store);
        session.handle(Action::NavigateDown, &mut blocks, &store);
        assert_eq!(session.viewport().selected(), Some(2));

        session.handle(Action::DeleteNote, &mut blocks, &store);

        assert_eq!(session.notes().as_slice(), &["one", "two"]);
        assert_eq!(session.viewport().selected(), Some(1));
        let content = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(content, "one\ntwo\n");
    }

    #[test]
    fn test_delete_middle_note_keeps_index() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("notes.txt"));
        let mut blocks = cache(2);
        let mut session = session_with(&["one", "two", "three"], &mut blocks, 10);
        session.handle(Action::NavigateDown, &mut blocks, &store);

        session.handle(Action::DeleteNote, &mut blocks, &store);

        assert_eq!(session.notes().as_slice(), &["one", "three"]);
        assert_eq!(session.viewport().selected(), Some(1));
    }

    #[test]
    fn test_delete_only_note_clears_selection() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("notes.txt"));
        let mut blocks = cache(2);
        let mut session = session_with(&["only"], &mut blocks, 10);

        session.handle(Action::DeleteNote, &mut blocks, &store);
        assert!(session.notes().is_empty());
        assert_eq!(session.viewport().selected(), None);
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "");

        // 空のときの削除は何もしない
        session.handle(Action::DeleteNote, &mut blocks, &store);
        assert_eq!(session.viewport().selected(), None);
        assert!(session.layout().is_empty());
    }

    #[test]
    fn test_backspace() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("notes.txt"));
        let mut blocks = cache(1);
        let mut session = session_with(&[], &mut blocks, 10);

        session.handle(Action::Backspace, &mut blocks, &store);
        assert_eq!(session.input(), "");

        type_text(&mut session, "abc", &mut blocks, &store);
        session.handle(Action::Backspace, &mut blocks, &store);
        assert_eq!(session.input(), "ab");
    }

    #[test]
    fn test_quit() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("notes.txt"));
        let mut blocks = cache(1);
        let mut session = session_with(&["a"], &mut blocks, 10);

        assert_eq!(
            session.handle(Action::Ignore, &mut blocks, &store),
            Flow::Continue
        );
        assert_eq!(session.handle(Action::Quit, &mut blocks, &store), Flow::Quit);
    }

    #[test]
    fn test_lone_escape_does_not_quit() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("notes.txt"));
        let mut blocks = cache(1);
        let mut session = session_with(&["a", "b"], &mut blocks, 10);
        type_text(&mut session, "draft", &mut blocks, &store);

        // 分割された矢印キー: Esc の後に残りが文字として届く
        let now = Instant::now();
        assert_eq!(
            session.handle_key(Key::Esc, &mut blocks, &store, now),
            Flow::Continue
        );
        assert_eq!(session.input(), "draft");
        assert_eq!(session.notes().len(), 2);
        assert_eq!(
            session.handle_key(Key::Ctrl('q'), &mut blocks, &store, now),
            Flow::Quit
        );
    }

    #[test]
    fn test_submit_scrolls_new_note_into_view() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("notes.txt"));
        let mut blocks = cache(4);
        // 開始行: 0, 5, 10
        let mut session = session_with(&["a", "b", "c"], &mut blocks, 6);

        type_text(&mut session, "d", &mut blocks, &store);
        session.handle(Action::Submit, &mut blocks, &store);

        let start = session.layout().note_start_row(3).unwrap();
        let scroll = session.viewport().scroll();
        assert_eq!(session.viewport().selected(), Some(3));
        assert!(start >= scroll && start < scroll + 6);
    }

    #[test]
    fn test_page_keys_move_scroll_only() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("notes.txt"));
        let mut blocks = cache(4);
        let mut session = session_with(&["a", "b", "c", "d"], &mut blocks, 5);

        session.handle(Action::PageDown, &mut blocks, &store);
        assert_eq!(session.viewport().scroll(), 5);
        assert_eq!(session.viewport().selected(), Some(0));

        session.handle(Action::PageUp, &mut blocks, &store);
        assert_eq!(session.viewport().scroll(), 0);
    }

    #[test]
    fn test_tall_note_scroll_pins_first_row() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("notes.txt"));
        let mut blocks = BlockCache::new(Box::new(FakeRenderer::new(3).with_tall("tall", 20)));
        let mut session = session_with(&["a", "tall", "b"], &mut blocks, 10);

        session.handle(Action::NavigateDown, &mut blocks, &store);

        let start = session.layout().note_start_row(1).unwrap();
        assert_eq!(session.viewport().scroll(), start);
        assert_eq!(session.frame(Instant::now()).rows[0].text, "tall#0");
    }

    #[test]
    fn test_save_failure_keeps_note() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("missing").join("notes.txt"));
        let mut blocks = cache(1);
        let mut session = session_with(&[], &mut blocks, 10);

        type_text(&mut session, "kept", &mut blocks, &store);
        session.handle(Action::Submit, &mut blocks, &store);

        assert_eq!(session.notes().as_slice(), &["kept"]);
        assert!(session.status().unwrap().starts_with("Save failed"));
    }

    #[test]
    fn test_successful_save_clears_status() {
        let dir = tempdir().unwrap();
        let bad = FileStore::new(dir.path().join("missing").join("notes.txt"));
        let good = FileStore::new(dir.path().join("notes.txt"));
        let mut blocks = cache(1);
        let mut session = session_with(&[], &mut blocks, 10);

        type_text(&mut session, "first", &mut blocks, &bad);
        session.handle(Action::Submit, &mut blocks, &bad);
        assert!(session.status().is_some());

        type_text(&mut session, "second", &mut blocks, &good);
        session.handle(Action::Submit, &mut blocks, &good);

        assert_eq!(session.status(), None);
        // 前回失敗したノートも含めて保存される
        let content = std::fs::read_to_string(good.path()).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn test_load_failure_starts_empty() {
        let dir = tempdir().unwrap();
        // ディレクトリは読めない
        let store = FileStore::new(dir.path());
        let mut blocks = cache(1);

        let session = Session::load(&store, &mut blocks, 10, Instant::now(), DECAY);

        assert!(session.notes().is_empty());
        assert!(session.status().unwrap().starts_with("Load failed"));
    }

    #[test]
    fn test_highlight_decays_and_returns_on_key() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("notes.txt"));
        let mut blocks = cache(1);
        let start = Instant::now();
        let mut session = Session::new(
            NoteList::from_lines(["a", "b"]),
            &mut blocks,
            10,
            start,
            DECAY,
        );
        assert!(session.frame(start).highlight);

        let idle = start + Duration::from_secs(3);
        assert!(!session.frame(idle).highlight);

        // 未対応キーでも入力として扱う
        session.handle_key(Key::F(5), &mut blocks, &store, idle);
        assert!(session.frame(idle).highlight);
        assert_eq!(session.viewport().selected(), Some(0));
    }

    #[test]
    fn test_frame_reports_state() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("notes.txt"));
        let mut blocks = cache(2);
        let mut session = session_with(&["a", "b"], &mut blocks, 4);
        session.handle_key(Key::Char('x'), &mut blocks, &store, Instant::now());

        let frame = session.frame(Instant::now());

        assert_eq!(frame.rows.len(), 4);
        assert_eq!(frame.selected, Some(0));
        assert_eq!(frame.input, "x");
        assert_eq!(frame.note_count, 2);
        assert_eq!(frame.status, None);
    }
}

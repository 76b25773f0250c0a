use termion::event::Key;

/// キー入力を解釈した操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    NavigateUp,
    NavigateDown,
    PageUp,
    PageDown,
    DeleteNote,
    Backspace,
    Char(char),
    Submit,
    Quit,
    /// 未対応のキー
    Ignore,
}

impl Action {
    pub fn from_key(key: Key) -> Self {
        match key {
            Key::Up => Action::NavigateUp,
            Key::Down => Action::NavigateDown,
            Key::PageUp => Action::PageUp,
            Key::PageDown => Action::PageDown,
            Key::Ctrl('d') | Key::Delete => Action::DeleteNote,
            Key::Backspace | Key::Ctrl('h') => Action::Backspace,
            // termion は \r も \n として返す
            Key::Char('\n') => Action::Submit,
            // Esc 単独では終了しない (矢印キーの列が分割されて届くことがある)
            Key::Ctrl('c') | Key::Ctrl('q') => Action::Quit,
            Key::Char(ch) if is_printable(ch) => Action::Char(ch),
            _ => Action::Ignore,
        }
    }
}

/// 入力できる文字は ASCII の 0x20..=0x7E のみ
pub fn is_printable(ch: char) -> bool {
    (' '..='~').contains(&ch)
}

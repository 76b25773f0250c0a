use std::io::{self, Stdout, Write};

use termion::raw::{IntoRawMode, RawTerminal};

/// raw mode の端末
///
/// drop 時に画面をクリアし、raw mode を解除する
pub struct Terminal {
    stdout: RawTerminal<Stdout>,
    size: (u16, u16),
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        let stdout = io::stdout().into_raw_mode()?;
        let size = termion::terminal_size()?;
        let mut terminal = Self { stdout, size };
        terminal.clear_screen()?;
        Ok(terminal)
    }

    pub fn stdout(&mut self) -> &mut RawTerminal<Stdout> {
        &mut self.stdout
    }

    /// 毎フレーム端末サイズを取り直す
    ///
    /// 取得に失敗した場合は前回の値を使う
    pub fn refresh_size(&mut self) -> (u16, u16) {
        if let Ok(size) = termion::terminal_size() {
            self.size = size;
        }
        self.size
    }

    pub fn size(&self) -> (u16, u16) {
        self.size
    }

    pub fn clear_screen(&mut self) -> io::Result<()> {
        write!(
            self.stdout,
            "{}{}",
            termion::clear::All,
            termion::cursor::Goto(1, 1)
        )?;
        self.stdout.flush()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        // 終了時の画面クリア
        let _ = write!(self.stdout, "{}", termion::cursor::Show);
        let _ = self.clear_screen();
    }
}

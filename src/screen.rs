use std::io::{self, Write};

use tracing::debug;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::layout::FlatRow;
use crate::session::Frame;
use crate::{HEADER_HEIGHT, UI_HEIGHT};

const HEADER: &str =
    "Fignotes - Type and Enter to add, Up/Down select, PgUp/PgDn scroll, Ctrl-D delete, Ctrl-Q quit";
const PROMPT: &str = "Add: ";
/// ブロックの左余白
const INDENT: &str = "  ";

pub struct Screen;

impl Screen {
    /// ヘッダ・ステータスバー・入力行を除いた表示行数
    pub fn viewport_rows(rows: u16) -> usize {
        rows.saturating_sub(UI_HEIGHT) as usize
    }

    /// 表示幅が `width` に収まるよう先頭から切り詰める
    pub fn fit_width(text: &str, width: usize) -> &str {
        let mut used = 0;
        for (idx, grapheme) in text.grapheme_indices(true) {
            used += grapheme.width();
            if used > width {
                return &text[..idx];
            }
        }
        text
    }

    /// 表示幅が `width` に収まるよう末尾を残して切り詰める
    pub fn fit_width_tail(text: &str, width: usize) -> &str {
        let mut used = 0;
        for (idx, grapheme) in text.grapheme_indices(true).rev() {
            used += grapheme.width();
            if used > width {
                return &text[idx + grapheme.len()..];
            }
        }
        text
    }

    pub fn draw_header(stdout: &mut impl Write, size: (u16, u16)) -> io::Result<()> {
        let (cols, rows) = size;
        if rows < UI_HEIGHT {
            return Ok(());
        }
        write!(
            stdout,
            "{}{}{}{}{}",
            termion::cursor::Goto(1, 1),
            termion::clear::CurrentLine,
            termion::style::Bold,
            Self::fit_width(HEADER, cols as usize),
            termion::style::Reset
        )?;
        // 2 行目は空行
        write!(
            stdout,
            "{}{}",
            termion::cursor::Goto(1, 2),
            termion::clear::CurrentLine
        )
    }

    fn draw_row(
        stdout: &mut impl Write,
        y: u16,
        row: Option<&FlatRow>,
        highlighted: bool,
        cols: u16,
    ) -> io::Result<()> {
        write!(
            stdout,
            "{}{}",
            termion::cursor::Goto(1, y),
            termion::clear::CurrentLine
        )?;
        let Some(row) = row else {
            return Ok(());
        };
        let width = (cols as usize).saturating_sub(INDENT.len());
        if width == 0 {
            return Ok(());
        }
        let text = Self::fit_width(&row.text, width);
        if highlighted {
            write!(
                stdout,
                "{}{}{}{}",
                INDENT,
                termion::style::Invert,
                text,
                termion::style::Reset
            )
        } else {
            write!(stdout, "{}{}", INDENT, text)
        }
    }

    /// 表示窓の行を描画する
    ///
    /// 描画できなかった行は飛ばす
    pub fn draw_rows(stdout: &mut impl Write, frame: &Frame<'_>, size: (u16, u16)) {
        let (cols, rows) = size;
        let viewport_rows = Self::viewport_rows(rows);

        for i in 0..viewport_rows {
            let row = frame.rows.get(i);
            let highlighted = frame.highlight
                && row.is_some_and(|r| r.owner.is_some() && r.owner == frame.selected);
            let y = HEADER_HEIGHT + 1 + i as u16;
            if let Err(err) = Self::draw_row(stdout, y, row, highlighted, cols) {
                debug!(row = y, error = %err, "skipping row");
            }
        }
    }

    pub fn draw_status_bar(
        stdout: &mut impl Write,
        frame: &Frame<'_>,
        notes_name: &str,
        size: (u16, u16),
    ) -> io::Result<()> {
        let (cols, rows) = size;
        if rows < 2 {
            return Ok(());
        }
        let width = cols as usize;

        let left = match frame.status {
            Some(message) => message.to_string(),
            None => format!("{} - {} notes", notes_name, frame.note_count),
        };
        let current = frame.selected.map(|s| s + 1).unwrap_or(0);
        let right = format!(" {}/{} ", current, frame.note_count);

        let left = Self::fit_width(&left, width);
        let padding = width
            .saturating_sub(left.width())
            .saturating_sub(right.width());
        let right = if left.width() + right.width() <= width {
            right.as_str()
        } else {
            ""
        };

        write!(
            stdout,
            "{}{}{}{}{}{}{}",
            termion::cursor::Goto(1, rows - 1),
            termion::clear::CurrentLine,
            termion::style::Invert,
            left,
            " ".repeat(padding),
            right,
            termion::style::Reset
        )
    }

    /// 最下行の入力欄を描画し、カーソルの列を返す
    ///
    /// 入力が長い場合は末尾を表示する
    pub fn draw_input_line(
        stdout: &mut impl Write,
        input: &str,
        size: (u16, u16),
    ) -> io::Result<u16> {
        let (cols, rows) = size;
        let prompt = Self::fit_width(PROMPT, cols as usize);
        let width = (cols as usize).saturating_sub(prompt.len() + 1);
        let visible = Self::fit_width_tail(input, width);

        write!(
            stdout,
            "{}{}{}{}",
            termion::cursor::Goto(1, rows.max(1)),
            termion::clear::CurrentLine,
            prompt,
            visible
        )?;
        let x = prompt.len() + visible.width() + 1;
        Ok(x.min(cols.max(1) as usize) as u16)
    }

    pub fn refresh(
        stdout: &mut impl Write,
        frame: &Frame<'_>,
        notes_name: &str,
        size: (u16, u16),
    ) -> io::Result<()> {
        let (_, rows) = size;
        // カーソルを隠す
        write!(stdout, "{}", termion::cursor::Hide)?;

        Self::draw_header(stdout, size)?;
        Self::draw_rows(stdout, frame, size);
        Self::draw_status_bar(stdout, frame, notes_name, size)?;
        let x = Self::draw_input_line(stdout, frame.input, size)?;

        // 入力欄の末尾にカーソル
        write!(
            stdout,
            "{}{}",
            termion::cursor::Goto(x, rows.max(1)),
            termion::cursor::Show
        )?;
        stdout.flush()
    }
}

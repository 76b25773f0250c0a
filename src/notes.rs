/// 表示順 = 保存順に並んだノートの一覧
///
/// 空文字列・空白のみのノートは決して保持しない
#[derive(Debug, Default, Clone, PartialEq)]
pub struct NoteList {
    notes: Vec<String>,
}

impl NoteList {
    pub fn new() -> Self {
        Self { notes: Vec::new() }
    }

    /// 読み込んだ行からノート一覧を作る (空行は捨てる)
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::new();
        for line in lines {
            list.push(line.as_ref());
        }
        list
    }

    /// 前後の空白を除いて末尾に追加する
    ///
    /// 追加できた場合はそのインデックスを返す
    pub fn push(&mut self, text: &str) -> Option<usize> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        self.notes.push(trimmed.to_string());
        Some(self.notes.len() - 1)
    }

    pub fn remove(&mut self, index: usize) -> Option<String> {
        if index < self.notes.len() {
            Some(self.notes.remove(index))
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.notes.get(index).map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.notes
    }
}

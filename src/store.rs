use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::error::StoreError;

/// ノート一覧の永続化先
pub trait NoteStore {
    fn load(&self) -> Result<Vec<String>, StoreError>;
    fn save(&self, notes: &[String]) -> Result<(), StoreError>;
}

/// 1 行 1 ノートのテキストファイル
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl NoteStore for FileStore {
    fn load(&self) -> Result<Vec<String>, StoreError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            // 初回起動時はファイルがないので空で始める
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(StoreError::Read(self.path.clone(), err)),
        };
        // 不正な UTF-8 は置換文字にする。読めずに空で始めると次の保存で消えてしまう
        let content = String::from_utf8_lossy(&bytes);

        let notes: Vec<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        debug!(path = %self.path.display(), count = notes.len(), "loaded notes");
        Ok(notes)
    }

    fn save(&self, notes: &[String]) -> Result<(), StoreError> {
        let write = || -> io::Result<()> {
            let mut file = BufWriter::new(File::create(&self.path)?);
            for note in notes {
                // 空行は書き込まない
                if note.trim().is_empty() {
                    continue;
                }
                writeln!(file, "{}", note)?;
            }
            file.flush()
        };
        write().map_err(|err| StoreError::Write(self.path.clone(), err))?;
        debug!(path = %self.path.display(), count = notes.len(), "saved notes");
        Ok(())
    }
}

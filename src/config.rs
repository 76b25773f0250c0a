use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::highlight::DEFAULT_DECAY;

pub const NOTES_FILE_NAME: &str = ".fignotes.txt";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

pub const USAGE: &str = "\
Usage: fignotes [NOTES_FILE]

Type and press Enter to add a note.
  Up/Down        select note
  PgUp/PgDn      scroll
  Ctrl-D/Del     delete selected note
  Ctrl-Q/Ctrl-C  quit

Environment:
  FIGNOTES_FILE       notes file (default ~/.fignotes.txt)
  FIGNOTES_LOG        append debug log to this file
  FIGNOTES_LOG_LEVEL  log filter (default debug)";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub notes_path: PathBuf,
    pub log_path: Option<PathBuf>,
    /// 選択ハイライトを消すまでの時間
    pub highlight_decay: Duration,
    /// 入力がないときの待ち時間
    pub poll_interval: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(Config),
    Help,
}

impl Config {
    /// プロセスの引数と環境変数から設定を作る
    pub fn from_env() -> Result<Command, ConfigError> {
        Self::resolve(
            std::env::args().skip(1),
            std::env::var_os("FIGNOTES_FILE").map(PathBuf::from),
            std::env::var_os("FIGNOTES_LOG").map(PathBuf::from),
            dirs::home_dir(),
        )
    }

    /// ノートファイルの優先順位: 引数 > FIGNOTES_FILE > ~/.fignotes.txt
    pub fn resolve<I>(
        args: I,
        env_file: Option<PathBuf>,
        env_log: Option<PathBuf>,
        home: Option<PathBuf>,
    ) -> Result<Command, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut arg_file = None;
        for arg in args {
            if arg == "-h" || arg == "--help" {
                return Ok(Command::Help);
            }
            // "-" 単体はファイル名として扱う
            if arg.starts_with('-') && arg.len() > 1 {
                return Err(ConfigError::UnknownOption(arg));
            }
            if arg_file.is_none() {
                arg_file = Some(PathBuf::from(arg));
            }
        }

        let notes_path = match arg_file.or(env_file) {
            Some(path) => path,
            None => home.ok_or(ConfigError::NoHomeDir)?.join(NOTES_FILE_NAME),
        };

        Ok(Command::Run(Config {
            notes_path,
            log_path: env_log,
            highlight_decay: DEFAULT_DECAY,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }))
    }
}

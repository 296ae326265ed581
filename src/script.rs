//! Turning a raw model response into a .ps1 file on disk.

use chrono::{DateTime, Local};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

use crate::config::{FileEncoding, GenerationConfig};
use crate::error::GenResult;

/// Maximum length of the slug derived from the task description
const TITLE_LEN: usize = 30;

fn code_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)```powershell\s*(.*?)\s*```").expect("valid regex"))
}

/// Extract the fenced PowerShell block from a model response.
///
/// Falls back to the whole trimmed response when no fence is present, since
/// models occasionally answer with bare code despite the format directive.
pub fn extract_code(text: &str) -> &str {
    match code_block_re().captures(text) {
        Some(caps) => caps.get(1).map(|m| m.as_str()).unwrap_or(""),
        None => text.trim(),
    }
}

/// Slug used in the output file name: first 30 chars of the task,
/// lowercased, anything outside [a-z0-9] flattened to underscores so the
/// task text cannot smuggle path separators into the file name.
pub fn short_title(task: &str) -> String {
    task.chars()
        .take(TITLE_LEN)
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim_matches('_')
        .to_string()
}

fn render_header(timestamp: DateTime<Local>) -> String {
    format!(
        "#===============================================================================\n\
         # Script generated by psforge\n\
         # Date: {}\n\
         #===============================================================================\n\n",
        timestamp.format("%Y-%m-%d %H:%M:%S")
    )
}

/// A generated script ready to be written to disk
#[derive(Debug, Clone)]
pub struct ScriptFile {
    pub file_name: String,
    pub code: String,
    pub encoding: FileEncoding,
}

impl ScriptFile {
    /// Build the script file from the model's raw response text.
    pub fn build(config: &GenerationConfig, response_text: &str) -> Self {
        Self::build_at(config, response_text, Local::now())
    }

    fn build_at(
        config: &GenerationConfig,
        response_text: &str,
        timestamp: DateTime<Local>,
    ) -> Self {
        let mut code = extract_code(response_text).to_string();
        if config.include_header {
            code = format!("{}{}", render_header(timestamp), code);
        }
        Self {
            file_name: format!("command_{}.ps1", short_title(&config.task_description)),
            code,
            encoding: config.file_encoding,
        }
    }

    /// Write the script into `dir` and return the full path.
    pub fn save(&self, dir: &Path) -> GenResult<PathBuf> {
        let path = dir.join(&self.file_name);
        std::fs::write(&path, self.encoded_bytes())?;
        debug!(path = %path.display(), "wrote generated script");
        Ok(path)
    }

    fn encoded_bytes(&self) -> Vec<u8> {
        match self.encoding {
            FileEncoding::Utf8 => self.code.as_bytes().to_vec(),
            FileEncoding::Ascii => self
                .code
                .chars()
                .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
                .collect(),
        }
    }
}

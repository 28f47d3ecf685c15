//! Input events and the line protocol used by the headless driver
//!
//! Each line is either JSON (`{"type":"press","key":"up"}`) or a short word
//! form (`press up`, `release left`, `reset`, `brake`, `quit`).

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Directional keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
}

impl Key {
    fn parse(word: &str) -> Option<Self> {
        match word {
            "up" | "forward" => Some(Key::Up),
            "down" | "backward" => Some(Key::Down),
            "left" => Some(Key::Left),
            "right" => Some(Key::Right),
            _ => None,
        }
    }
}

/// Events from the input collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    Press { key: Key },
    Release { key: Key },
    /// Back to the start pose, inputs cleared
    Reset,
    /// Zero speed and throttle, keep pose
    Brake,
    Quit,
}

/// Input line errors
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Malformed JSON input: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<InputEvent>, InputError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    if line.starts_with('{') {
        return Ok(Some(serde_json::from_str(line)?));
    }

    let lower = line.to_ascii_lowercase();
    let words: Vec<&str> = lower.split_whitespace().collect();
    let event = match words.as_slice() {
        ["press", key] => Key::parse(key).map(|key| InputEvent::Press { key }),
        ["release", key] => Key::parse(key).map(|key| InputEvent::Release { key }),
        ["reset"] | ["r"] => Some(InputEvent::Reset),
        ["brake"] | ["b"] => Some(InputEvent::Brake),
        ["quit"] | ["exit"] | ["esc"] => Some(InputEvent::Quit),
        _ => None,
    };

    event
        .map(Some)
        .ok_or_else(|| InputError::UnknownCommand(line.to_string()))
}

/// Forward parsed events from `reader` until EOF, then request quit
pub fn spawn_reader<R>(reader: R, tx: mpsc::Sender<InputEvent>) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => match parse_line(&line) {
                    Ok(Some(event)) => {
                        debug!(?event, "Input event");
                        if tx.send(event).await.is_err() {
                            return;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => warn!(error = %e, "Ignoring input line"),
                },
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "Input stream failed");
                    break;
                }
            }
        }
        let _ = tx.send(InputEvent::Quit).await;
    })
}

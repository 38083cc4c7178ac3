use std::io::Write;

use chrono::Local;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::api::{ClientError, JournalApi, Note};

const SUMMARY_COMMAND: &str = "/summary";
const QUIT_COMMAND: &str = "/quit";

/// Returns the text to submit, or `None` when the compose box is blank.
pub fn submission(input: &str) -> Option<&str> {
    let content = input.trim_end_matches(['\r', '\n']);
    if content.trim().is_empty() {
        None
    } else {
        Some(content)
    }
}

pub fn render_notes(notes: &[Note], out: &mut impl Write) -> std::io::Result<()> {
    if notes.is_empty() {
        writeln!(out, "(no notes yet)")?;
    }

    for note in notes {
        let time_str = note
            .timestamp
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S");
        writeln!(out, "{time_str}  {}", note.content)?;
    }

    Ok(())
}

async fn refresh(api: &JournalApi, out: &mut impl Write) -> Result<(), ClientError> {
    let notes = api.list_notes().await?;
    render_notes(&notes, out)?;
    Ok(())
}

/// Interactive loop: each line of `input` is one compose-box submission.
pub async fn run<R, W, E>(
    api: &JournalApi,
    input: R,
    out: &mut W,
    err: &mut E,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    E: Write,
{
    if let Err(e) = refresh(api, out).await {
        writeln!(err, "error: {e}")?;
    }

    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match line.trim() {
            QUIT_COMMAND => break,
            SUMMARY_COMMAND => match api.summarize_today().await {
                Ok(summary) => writeln!(out, "{summary}")?,
                Err(e) => writeln!(err, "error: {e}")?,
            },
            _ => {
                let Some(content) = submission(&line) else {
                    continue;
                };
                if let Err(e) = api.create_note(content).await {
                    writeln!(err, "error: {e}")?;
                    continue;
                }
                if let Err(e) = refresh(api, out).await {
                    writeln!(err, "error: {e}")?;
                }
            }
        }
    }

    Ok(())
}

use crate::error::{QbankError, Result};
use std::io::Write;
use std::process::{Command, Stdio};

/// Copies text to the system clipboard in an OS-specific way.
/// - macOS: pbcopy
/// - Linux: xclip, falling back to xsel
/// - Windows: clip.exe
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        pipe_to(&[("pbcopy", &[] as &[&str])], text)
    }

    #[cfg(target_os = "linux")]
    {
        pipe_to(
            &[
                ("xclip", &["-selection", "clipboard"][..]),
                ("xsel", &["--clipboard", "--input"][..]),
            ],
            text,
        )
    }

    #[cfg(target_os = "windows")]
    {
        pipe_to(&[("clip", &[] as &[&str])], text)
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        let _ = text;
        Err(QbankError::Api(
            "Clipboard not supported on this platform".to_string(),
        ))
    }
}

/// Spawns the first program that starts and writes `text` to its stdin.
#[cfg_attr(
    not(any(target_os = "macos", target_os = "linux", target_os = "windows")),
    allow(dead_code)
)]
fn pipe_to(candidates: &[(&str, &[&str])], text: &str) -> Result<()> {
    let mut last_error = None;

    for (program, args) in candidates {
        let mut child = match Command::new(program)
            .args(*args)
            .stdin(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                last_error = Some(format!("{}: {}", program, e));
                continue;
            }
        };

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .map_err(|e| QbankError::Api(format!("Failed to write to {}: {}", program, e)))?;
        }

        let status = child
            .wait()
            .map_err(|e| QbankError::Api(format!("Failed to wait for {}: {}", program, e)))?;

        return if status.success() {
            Ok(())
        } else {
            Err(QbankError::Api(format!("{} exited with error", program)))
        };
    }

    Err(QbankError::Api(format!(
        "Could not access the system clipboard ({})",
        last_error.unwrap_or_else(|| "no clipboard program".to_string())
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_programs_report_an_error() {
        let err = pipe_to(&[("qbank-no-such-clipboard-tool", &[] as &[&str])], "x").unwrap_err();
        assert!(
            matches!(err, QbankError::Api(msg) if msg.contains("qbank-no-such-clipboard-tool"))
        );
    }
}

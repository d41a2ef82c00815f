/// Diagnostics log — best-effort failures (feedback posts, voice errors,
/// background list refreshes) land here instead of the screen.
///
/// One timestamped line per event, appended to
/// `~/.local/share/mediassist/client.log`. Write errors are silently
/// ignored — diagnostics must never crash the client.
use std::io::Write;
use std::path::PathBuf;

fn log_path() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            std::env::var("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(".local/share")
        })
        .join("mediassist")
        .join("client.log")
}

pub fn log(msg: &str) {
    let _ = try_log(msg);
}

fn try_log(msg: &str) -> std::io::Result<()> {
    let path = log_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;
    writeln!(file, "[{}] {msg}", chrono::Utc::now().format("%Y-%m-%d %H:%M:%S"))?;
    Ok(())
}

use std::{
  fs::OpenOptions,
  io::Write,
  os::unix::fs::OpenOptionsExt,
  path::Path,
  process::{Command, Stdio},
  time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{anyhow, Context, Result};
use tracing::debug;

/// Command and arguments used to feed the system clipboard
fn clipboard_command() -> (&'static str, Vec<&'static str>) {
  if cfg!(target_os = "macos") {
    ("pbcopy", vec![])
  } else {
    ("xclip", vec!["-selection", "clipboard"])
  }
}

/// Copy `contents` to the system clipboard
pub fn copy_to_clipboard(contents: &str) -> Result<()> {
  let (cmd, args) = clipboard_command();
  debug!("Copying to clipboard with {cmd}");

  let mut child = Command::new(cmd)
    .args(&args)
    .stdin(Stdio::piped())
    .spawn()
    .with_context(|| format!("failed to run {cmd}"))?;

  child
    .stdin
    .take()
    .ok_or_else(|| anyhow!("unable to open stdin of {cmd}"))?
    .write_all(contents.as_bytes())?;

  let status = child.wait()?;
  if !status.success() {
    return Err(anyhow!("{cmd} exited with {status}"));
  }

  Ok(())
}

/// Write a file to disk, failing if it already exists
pub fn write_new_file<P: AsRef<Path>>(contents: &[u8], path: P, mode: Option<u32>) -> Result<()> {
  let mut file = OpenOptions::new()
    .write(true)
    .create_new(true)
    .mode(mode.unwrap_or(0o644))
    .open(&path)
    .with_context(|| format!("failed to create {}", path.as_ref().display()))?;
  file.write_all(contents)?;

  Ok(())
}

/// Seconds since the Unix epoch
pub fn now_secs() -> i64 {
  SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .map(|d| d.as_secs() as i64)
    .unwrap_or_default()
}

/// Milliseconds since the Unix epoch
pub fn now_millis() -> i64 {
  SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .map(|d| d.as_millis() as i64)
    .unwrap_or_default()
}

/// True when `created` (epoch seconds) is more than `max_age_secs` before `now`
pub fn is_expired(created: i64, now: i64, max_age_secs: i64) -> bool {
  now - created > max_age_secs
}

#[cfg(test)]
mod tests {
  use std::fs;

  use rstest::*;

  use super::*;

  #[rstest]
  #[case(0, 100, 100, false)]
  #[case(0, 101, 100, true)]
  #[case(50, 100, 100, false)]
  fn it_checks_expiry(#[case] created: i64, #[case] now: i64, #[case] max_age: i64, #[case] expected: bool) {
    assert_eq!(is_expired(created, now, max_age), expected);
  }

  #[test]
  fn it_writes_new_file_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");

    write_new_file(b"- profile: default\n", &path, Some(0o600)).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "- profile: default\n");
    assert!(write_new_file(b"again", &path, None).is_err());
  }
}

// crates/test-utils/src/fake_brew.rs

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

/// Script used by [`FakeBrew::standard`].
///
/// - `search [term]`: two lines, or one line after a second for `slowpkg`
/// - `install <pkg>`: three progress lines; `slow` then blocks for 30s
/// - `info <pkg>`: one line
/// - `outdated`: no output, success
/// - `fail`: stderr + exit 3
/// - `sleep`: blocks for 30s
/// - `--cache`: one line
/// - anything else: exit 1
///
/// Every invocation appends its arguments to `invocations.log` next to the
/// script.
pub const STANDARD_SCRIPT: &str = r#"
printf '%s\n' "$*" >> "$(dirname "$0")/invocations.log"
case "$1" in
  search)
    if [ "$2" = "slowpkg" ]; then
      sleep 1
      echo "slowpkg"
    else
      echo "wget"
      echo "wget-static"
    fi
    ;;
  install)
    echo "==> Downloading $2"
    echo "==> Pouring $2"
    echo "==> Summary"
    if [ "$2" = "slow" ]; then
      exec sleep 30
    fi
    ;;
  info)
    echo "$2: stable 1.0"
    ;;
  outdated)
    ;;
  fail)
    echo "Error: something broke" >&2
    exit 3
    ;;
  sleep)
    exec sleep 30
    ;;
  --cache)
    echo "/tmp/brew-cache"
    ;;
  *)
    echo "unknown command: $*"
    exit 1
    ;;
esac
"#;

/// A throwaway `brew` executable: a `/bin/sh` script in a temp dir.
#[derive(Debug)]
pub struct FakeBrew {
    dir: TempDir,
    path: PathBuf,
}

impl FakeBrew {
    /// Script with the given body (the shebang is added).
    pub fn new(body: &str) -> Result<Self> {
        let dir = tempfile::tempdir().context("creating temp dir for fake brew")?;
        let path = dir.path().join("brew");

        fs::write(&path, format!("#!/bin/sh\n{body}"))
            .with_context(|| format!("writing fake brew to {:?}", path))?;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .with_context(|| format!("making {:?} executable", path))?;

        Ok(Self { dir, path })
    }

    pub fn standard() -> Result<Self> {
        Self::new(STANDARD_SCRIPT)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Argument lines recorded by the standard script, in call order.
    pub fn invocations(&self) -> Vec<String> {
        fs::read_to_string(self.dir.path().join("invocations.log"))
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

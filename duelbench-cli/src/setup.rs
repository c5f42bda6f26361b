//! Pre-flight Checks
//!
//! Platform, dataset, tool, and build validation. Everything here runs
//! before the first measurement; any failure is fatal and reported with
//! the failing command and captured error text.

use crate::error::BenchError;
use duelbench_core::{find_in_path, per_child_accounting_supported};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Fail unless the host provides per-child resource accounting.
pub fn check_platform() -> Result<(), BenchError> {
    if per_child_accounting_supported() {
        Ok(())
    } else {
        Err(BenchError::UnsupportedPlatform)
    }
}

/// Validate the dataset and return its byte size.
pub fn check_dataset(path: &Path) -> Result<u64, BenchError> {
    let meta = std::fs::metadata(path).map_err(|e| BenchError::Dataset {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    if meta.len() == 0 {
        return Err(BenchError::Dataset {
            path: path.display().to_string(),
            reason: "file is empty".to_string(),
        });
    }
    Ok(meta.len())
}

/// Locate `taskset`, required when CPU pinning is requested.
pub fn require_taskset() -> Result<PathBuf, BenchError> {
    find_in_path("taskset").ok_or_else(|| BenchError::MissingTool {
        tool: "taskset".to_string(),
    })
}

/// Run the configured build command, failing with its stderr on error.
pub fn run_build(command: &[String], cwd: &Path) -> Result<(), BenchError> {
    let command_line = command.join(" ");
    tracing::info!(command = %command_line, "building candidate binaries");
    println!("[build] {command_line}");

    let output = Command::new(&command[0])
        .args(&command[1..])
        .current_dir(cwd)
        .output()
        .map_err(|e| BenchError::BuildFailed {
            command: command_line.clone(),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(BenchError::BuildFailed {
            command: command_line,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}

/// Check that a candidate's program exists: a path must point at a file,
/// a bare name must resolve through PATH.
pub fn resolve_program(program: &str, cwd: &Path) -> Result<(), BenchError> {
    let found = if program.contains('/') {
        let path = Path::new(program);
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            cwd.join(path)
        };
        absolute.is_file()
    } else {
        find_in_path(program).is_some()
    };

    if found {
        Ok(())
    } else {
        Err(BenchError::MissingProgram {
            program: program.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_dataset() {
        let err = check_dataset(Path::new("/nonexistent/duelbench.log")).unwrap_err();
        assert!(matches!(err, BenchError::Dataset { .. }));
    }

    #[test]
    fn test_empty_dataset() {
        let dir = std::env::temp_dir();
        let path = dir.join("duelbench-empty-test.log");
        std::fs::write(&path, b"").unwrap();
        let err = check_dataset(&path).unwrap_err();
        match err {
            BenchError::Dataset { reason, .. } => assert!(reason.contains("empty")),
            other => panic!("expected Dataset error, got {other:?}"),
        }
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_dataset_size() {
        let dir = std::env::temp_dir();
        let path = dir.join("duelbench-size-test.log");
        std::fs::write(&path, b"line one\nline two\n").unwrap();
        assert_eq!(check_dataset(&path).unwrap(), 18);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_resolve_program_in_path() {
        let cwd = std::env::current_dir().unwrap();
        assert!(resolve_program("true", &cwd).is_ok());
        assert!(matches!(
            resolve_program("duelbench-no-such-program", &cwd),
            Err(BenchError::MissingProgram { .. })
        ));
    }

    #[test]
    fn test_resolve_program_by_path() {
        let cwd = std::env::current_dir().unwrap();
        assert!(matches!(
            resolve_program("target/release/duelbench-missing", &cwd),
            Err(BenchError::MissingProgram { .. })
        ));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_platform_supported() {
        assert!(check_platform().is_ok());
    }

    #[test]
    fn test_failed_build_captures_stderr() {
        let cwd = std::env::current_dir().unwrap();
        let command = vec![
            "sh".to_string(),
            "-c".to_string(),
            "echo no target >&2; exit 2".to_string(),
        ];
        let err = run_build(&command, &cwd).unwrap_err();
        match err {
            BenchError::BuildFailed { stderr, .. } => assert_eq!(stderr, "no target"),
            other => panic!("expected BuildFailed, got {other:?}"),
        }
    }
}

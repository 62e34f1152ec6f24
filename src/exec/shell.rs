// src/exec/shell.rs

//! Shell command runner.

use std::path::Path;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

/// Run `cmd` through the platform shell in `cwd` and wait for it.
///
/// `args` are passed as positional parameters (`$1`, `$2`, ... under `sh`).
/// Each stdout/stderr line is echoed with a `[task]` prefix. Returns the
/// exit code; `-1` if the process was terminated by a signal.
pub async fn run_shell(task: &str, cmd: &str, args: &[String], cwd: &Path) -> Result<i32> {
    info!(task, cmd, "starting process");

    // Build a shell command appropriate for the platform.
    let mut command = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd).args(args);
        c
    } else {
        let mut c = Command::new("sh");
        // `$0` is the task name so `$@` is exactly `args`.
        c.arg("-c").arg(cmd).arg(task).args(args);
        c
    };

    command
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = command
        .spawn()
        .with_context(|| format!("spawning process for task '{task}'"))?;

    let stdout_pump = child.stdout.take().map(|stdout| {
        let task = task.to_string();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                println!("[{task}] {line}");
            }
        })
    });

    let stderr_pump = child.stderr.take().map(|stderr| {
        let task = task.to_string();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                eprintln!("[{task}] {line}");
            }
        })
    });

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for process of task '{task}'"))?;

    // Drain remaining output before reporting.
    for pump in [stdout_pump, stderr_pump].into_iter().flatten() {
        let _ = pump.await;
    }

    let code = status.code().unwrap_or(-1);
    debug!(task, exit_code = code, success = status.success(), "process exited");
    Ok(code)
}

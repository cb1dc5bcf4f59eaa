use super::lip_sync_repository::LipSyncRepository;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Lines of stderr kept in the error message when the process fails
const STDERR_TAIL_LINES: usize = 5;

/// Wav2Lip inference script run as a child process
pub struct Wav2LipRepository {
    python: String,
    script: PathBuf,
    checkpoint: PathBuf,
    fallback_checkpoint: PathBuf,
    output: PathBuf,
    work_dir: PathBuf,
}

impl Wav2LipRepository {
    pub fn new(
        python: String,
        script: PathBuf,
        checkpoint: PathBuf,
        fallback_checkpoint: PathBuf,
        output: PathBuf,
        work_dir: PathBuf,
    ) -> Self {
        // The child runs inside work_dir, so relative paths handed to it must not be
        // resolved against work_dir a second time
        let work_dir = std::path::absolute(&work_dir).unwrap_or(work_dir);
        Self {
            python,
            script,
            checkpoint,
            fallback_checkpoint,
            output,
            work_dir,
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.work_dir.join(path)
        }
    }

    fn stderr_tail(stderr: &[u8]) -> String {
        let text = String::from_utf8_lossy(stderr);
        let lines: Vec<&str> = text.lines().collect();
        lines[lines.len().saturating_sub(STDERR_TAIL_LINES)..].join("\n")
    }
}

#[async_trait]
impl LipSyncRepository for Wav2LipRepository {
    async fn run(&self, face: &Path, audio: &Path) -> Result<PathBuf, String> {
        let checkpoint = self.checkpoint().ok_or_else(|| {
            format!(
                "Wav2Lip checkpoint not found at {} or {}",
                self.resolve(&self.checkpoint).display(),
                self.resolve(&self.fallback_checkpoint).display()
            )
        })?;

        let face = std::path::absolute(face)
            .map_err(|e| format!("Invalid face path {}: {}", face.display(), e))?;
        let audio = std::path::absolute(audio)
            .map_err(|e| format!("Invalid audio path {}: {}", audio.display(), e))?;

        let output = self.resolve(&self.output);
        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
        }

        // Output from an earlier run must not be mistaken for this run's result
        match tokio::fs::remove_file(&output).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(format!("Failed to clear {}: {}", output.display(), e)),
        }

        tracing::info!(
            python = %self.python,
            script = %self.script.display(),
            checkpoint = %checkpoint.display(),
            output = %output.display(),
            "Starting Wav2Lip inference"
        );

        let start_time = std::time::Instant::now();
        let result = Command::new(&self.python)
            .arg(&self.script)
            .arg("--checkpoint_path")
            .arg(&checkpoint)
            .arg("--face")
            .arg(&face)
            .arg("--audio")
            .arg(&audio)
            .arg("--outfile")
            .arg(&output)
            .current_dir(&self.work_dir)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| format!("Failed to start Wav2Lip ({}): {}", self.python, e))?;

        if !result.status.success() {
            tracing::error!(
                status = %result.status,
                latency_ms = start_time.elapsed().as_millis(),
                "Wav2Lip inference failed"
            );
            return Err(format!(
                "Wav2Lip exited with {}: {}",
                result.status,
                Self::stderr_tail(&result.stderr)
            ));
        }

        if !output.is_file() {
            return Err(format!(
                "Wav2Lip finished but produced no video at {}",
                output.display()
            ));
        }

        tracing::info!(
            latency_ms = start_time.elapsed().as_millis(),
            output = %output.display(),
            "Wav2Lip inference completed"
        );

        Ok(output)
    }

    fn checkpoint(&self) -> Option<PathBuf> {
        [&self.checkpoint, &self.fallback_checkpoint]
            .into_iter()
            .map(|path| self.resolve(path))
            .find(|path| path.is_file())
    }
}

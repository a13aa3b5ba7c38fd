use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use scrape_logging::{scrape_debug, scrape_info};

use crate::clock::{format_timestamp, Clock};
use crate::persist::parent_dir;

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("failed to launch `git {step}`: {source}")]
    Spawn {
        step: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`git {step}` exited with {status}: {stderr}")]
    Failed {
        step: String,
        status: String,
        stderr: String,
    },
}

/// Hands the finished output file to something outside the scraper, e.g. a repository.
pub trait Publisher: Send + Sync {
    fn publish(&self, file: &Path) -> Result<(), PublishError>;
}

/// Commits the output file in its working tree and pushes it.
pub struct GitPublisher {
    user_name: String,
    user_email: String,
    message_prefix: String,
    clock: Arc<dyn Clock>,
}

impl GitPublisher {
    pub fn new(keyword: &str, clock: Arc<dyn Clock>) -> Self {
        Self {
            user_name: "GitHub Actions".to_string(),
            user_email: "actions@github.com".to_string(),
            message_prefix: format!("自动更新{keyword}直播源"),
            clock,
        }
    }

    pub fn with_identity(mut self, user_name: impl Into<String>, user_email: impl Into<String>) -> Self {
        self.user_name = user_name.into();
        self.user_email = user_email.into();
        self
    }

    pub fn commit_message(&self) -> String {
        format!("{} {}", self.message_prefix, format_timestamp(&self.clock.now()))
    }

    fn git(&self, workdir: &Path, args: &[&str]) -> Result<(), PublishError> {
        let step = args.join(" ");
        scrape_debug!("Running git {} in {:?}", step, workdir);
        let output = Command::new("git")
            .current_dir(workdir)
            .args(args)
            .output()
            .map_err(|source| PublishError::Spawn {
                step: step.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(PublishError::Failed {
                step,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

impl Publisher for GitPublisher {
    fn publish(&self, file: &Path) -> Result<(), PublishError> {
        let workdir = parent_dir(file);
        let file_name: PathBuf = file
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| file.to_path_buf());
        let file_arg = file_name.to_string_lossy().into_owned();
        let message = self.commit_message();

        self.git(&workdir, &["config", "user.name", self.user_name.as_str()])?;
        self.git(&workdir, &["config", "user.email", self.user_email.as_str()])?;
        self.git(&workdir, &["add", file_arg.as_str()])?;
        self.git(&workdir, &["commit", "-m", message.as_str()])?;
        self.git(&workdir, &["push"])?;
        scrape_info!("Committed and pushed {:?}: {}", file, message);
        Ok(())
    }
}

use crate::command::{required_arg, Command, Pending};
use crate::context::Context;
use crate::error::ApiError;
use crate::reference::Decorator;
use async_trait::async_trait;
use std::path::Path;

/// `read <path> [token]`: load a text file relative to the working directory.
///
/// The file's extension carries over to the stored Reference.
pub struct ReadCommand;

#[async_trait]
impl Command for ReadCommand {
    fn name(&self) -> &str {
        "read"
    }

    fn description(&self) -> &str {
        "Read a text file into a reference"
    }

    async fn execute(
        &self,
        context: &dyn Context,
        args: &[String],
    ) -> Result<Vec<Pending>, ApiError> {
        let requested = required_arg(args, 0, "path")?;
        let path = context.working_dir().join(requested);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ApiError::NotFound(format!("File {}", path.display())));
            }
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                return Err(ApiError::Validation(format!(
                    "File {} is not valid UTF-8",
                    path.display()
                )));
            }
            Err(e) => {
                return Err(ApiError::Execution(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let mut pending = Pending::new(content).with_token(args.get(1).map(String::as_str));
        if let Some(ext) = Path::new(requested).extension().and_then(|e| e.to_str()) {
            pending = pending.with(Decorator::extension(ext));
        }
        Ok(vec![pending])
    }
}

use crate::command::{resolve_or_literal, Command, Pending};
use crate::context::Context;
use crate::error::ApiError;
use async_trait::async_trait;

/// `join <part>...`: concatenate parts, each resolved as a Reference when it names one.
pub struct JoinCommand;

#[async_trait]
impl Command for JoinCommand {
    fn name(&self) -> &str {
        "join"
    }

    fn description(&self) -> &str {
        "Concatenate literals and referenced values"
    }

    async fn execute(
        &self,
        context: &dyn Context,
        args: &[String],
    ) -> Result<Vec<Pending>, ApiError> {
        if args.is_empty() {
            return Err(ApiError::Validation(
                "join needs at least one part".to_string(),
            ));
        }
        let mut joined = String::new();
        for part in args {
            joined.push_str(&resolve_or_literal(context, part).await);
        }
        Ok(vec![Pending::new(joined)])
    }
}

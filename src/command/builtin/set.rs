use crate::command::{required_arg, Command, Pending};
use crate::context::Context;
use crate::error::ApiError;
use async_trait::async_trait;

/// `set <value> [token]`: store a literal value.
pub struct SetCommand;

#[async_trait]
impl Command for SetCommand {
    fn name(&self) -> &str {
        "set"
    }

    fn description(&self) -> &str {
        "Store a literal value, optionally under a token"
    }

    async fn execute(
        &self,
        _context: &dyn Context,
        args: &[String],
    ) -> Result<Vec<Pending>, ApiError> {
        let value = required_arg(args, 0, "value")?;
        if args.len() > 2 {
            return Err(ApiError::Validation(format!(
                "set takes at most 2 arguments, got {}",
                args.len()
            )));
        }
        let token = args.get(1).map(String::as_str);
        Ok(vec![Pending::new(value).with_token(token)])
    }
}

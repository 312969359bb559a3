use crate::command::{required_arg, resolve_or_literal, Command, Pending};
use crate::context::Context;
use crate::error::ApiError;
use async_trait::async_trait;
use regex::Regex;

/// `match <pattern> <input> [token...]`: one Reference per capture group.
///
/// Groups are emitted in group order; the n-th token names the n-th group. A group
/// that did not participate in the match yields an empty value so positions stay stable.
pub struct MatchCommand;

#[async_trait]
impl Command for MatchCommand {
    fn name(&self) -> &str {
        "match"
    }

    fn description(&self) -> &str {
        "Capture regex groups from a value, one reference per group"
    }

    async fn execute(
        &self,
        context: &dyn Context,
        args: &[String],
    ) -> Result<Vec<Pending>, ApiError> {
        let pattern = Regex::new(required_arg(args, 0, "pattern")?)?;
        let input = resolve_or_literal(context, required_arg(args, 1, "input")?).await;
        let tokens = &args[2..];

        let group_count = pattern.captures_len() - 1;
        if group_count == 0 {
            return Err(ApiError::Validation(format!(
                "Pattern '{}' has no capture groups",
                pattern.as_str()
            )));
        }
        if tokens.len() > group_count {
            return Err(ApiError::Validation(format!(
                "{} tokens given for {} capture group(s)",
                tokens.len(),
                group_count
            )));
        }

        let captures = pattern.captures(&input).ok_or_else(|| {
            ApiError::Validation(format!("Pattern '{}' did not match input", pattern.as_str()))
        })?;

        Ok((1..=group_count)
            .map(|group| {
                let value = captures.get(group).map(|m| m.as_str()).unwrap_or_default();
                Pending::new(value).with_token(tokens.get(group - 1).map(String::as_str))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::EphemeralContext;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_capture_groups_become_references_in_order() {
        let ctx = EphemeralContext::default();
        let refs = ctx
            .run(
                &MatchCommand,
                &args(&[
                    r"(\w+) (\w+), age (\d+)",
                    "John Doe, age 30",
                    "firstName",
                    "lastName",
                    "age",
                ]),
            )
            .await
            .unwrap();

        let contents: Vec<&str> = refs.iter().map(|r| r.content()).collect();
        assert_eq!(contents, vec!["John", "Doe", "30"]);
        assert_eq!(ctx.get("lastName").await.as_deref(), Some("Doe"));
        assert_eq!(refs[2].token(), Some("age"));
    }

    #[tokio::test]
    async fn test_input_may_be_a_reference() {
        let ctx = EphemeralContext::default();
        ctx.store("k=v".to_string(), vec![crate::reference::Decorator::token("pair")])
            .await
            .unwrap();
        let refs = ctx
            .run(&MatchCommand, &args(&[r"(\w)=(\w)", "pair"]))
            .await
            .unwrap();
        assert_eq!(refs.len(), 2);
        assert!(refs[0].token().is_none());
        assert_eq!(refs[1].content(), "v");
    }

    #[tokio::test]
    async fn test_invalid_pattern_is_validation() {
        let ctx = EphemeralContext::default();
        let err = ctx
            .run(&MatchCommand, &args(&["(open", "text"]))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_no_match_and_too_many_tokens() {
        let ctx = EphemeralContext::default();
        let no_match = ctx
            .run(&MatchCommand, &args(&[r"(\d+)", "abc"]))
            .await
            .unwrap_err();
        assert!(matches!(no_match, ApiError::Validation(_)));

        let too_many = ctx
            .run(&MatchCommand, &args(&[r"(\d+)", "42", "a", "b"]))
            .await
            .unwrap_err();
        assert!(matches!(too_many, ApiError::Validation(_)));
        assert!(ctx.get("a").await.is_none());
    }
}

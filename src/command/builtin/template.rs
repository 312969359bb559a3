use crate::command::{required_arg, resolve_or_literal, Command, Pending};
use crate::context::Context;
use crate::error::ApiError;
use async_trait::async_trait;
use regex::Regex;

const PLACEHOLDER: &str = r"\{\{\s*([^{}\s]+)\s*\}\}";

/// `template <template> [token]`: substitute `{{key}}` placeholders with stored values.
///
/// The template itself may name a Reference (e.g. a file loaded with `read`).
pub struct TemplateCommand;

#[async_trait]
impl Command for TemplateCommand {
    fn name(&self) -> &str {
        "template"
    }

    fn description(&self) -> &str {
        "Replace {{key}} placeholders with referenced values"
    }

    async fn execute(
        &self,
        context: &dyn Context,
        args: &[String],
    ) -> Result<Vec<Pending>, ApiError> {
        let template = resolve_or_literal(context, required_arg(args, 0, "template")?).await;
        let expanded = expand_template(context, &template).await?;
        Ok(vec![
            Pending::new(expanded).with_token(args.get(1).map(String::as_str))
        ])
    }
}

/// Replace every `{{key}}` in `template` with `context.get(key)`.
///
/// A placeholder that resolves to nothing is a NotFound error.
pub async fn expand_template(context: &dyn Context, template: &str) -> Result<String, ApiError> {
    let placeholder = Regex::new(PLACEHOLDER)?;
    let spans: Vec<(usize, usize, String)> = placeholder
        .captures_iter(template)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let key = caps.get(1)?;
            Some((whole.start(), whole.end(), key.as_str().to_string()))
        })
        .collect();

    let mut out = String::with_capacity(template.len());
    let mut cursor = 0;
    for (start, end, key) in spans {
        let value = context
            .get(&key)
            .await
            .ok_or_else(|| ApiError::NotFound(format!("Template placeholder '{}'", key)))?;
        out.push_str(&template[cursor..start]);
        out.push_str(&value);
        cursor = end;
    }
    out.push_str(&template[cursor..]);
    Ok(out)
}

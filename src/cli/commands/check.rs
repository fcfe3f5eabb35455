//! Implementation of the `keyward check` command.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::cli::output::table::format_field_statuses;
use crate::cli::output::{output, CommandOutput};
use crate::domain::errors::ApiType;
use crate::domain::models::{Config, LlmType};
use crate::infrastructure::credentials::CredentialResolver;
use crate::services::{CredentialCheck, FieldStatus};

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Check the embedding endpoint instead of the completion endpoint
    #[arg(long)]
    pub embedding: bool,

    /// Endpoint type, e.g. azure_openai_chat (defaults to the configured type)
    #[arg(long)]
    pub llm_type: Option<LlmType>,
}

impl CheckArgs {
    fn resolve_llm_type(&self, config: &Config) -> LlmType {
        self.llm_type.unwrap_or(if self.embedding {
            config.llm.embedding_type
        } else {
            config.llm.completion_type
        })
    }
}

#[derive(Debug, Serialize)]
pub struct CheckOutput {
    pub llm_type: LlmType,
    pub api_type: ApiType,
    pub ok: bool,
    pub fields: Vec<FieldStatus>,
}

impl CommandOutput for CheckOutput {
    fn to_human(&self) -> String {
        let verdict = if self.ok {
            console::style("all required credentials are set").green()
        } else {
            console::style("required credentials are missing").red()
        };
        format!(
            "{} ({} API)\n{}\n{}",
            self.llm_type,
            self.api_type,
            format_field_statuses(&self.fields),
            verdict
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Run `keyward check`.
pub fn execute(args: &CheckArgs, config: &Config, json_mode: bool) -> Result<()> {
    execute_with(args, config, json_mode, &CredentialCheck::new(CredentialResolver::from_env()))
}

fn execute_with(
    args: &CheckArgs,
    config: &Config,
    json_mode: bool,
    check: &CredentialCheck,
) -> Result<()> {
    let llm_type = args.resolve_llm_type(config);
    let fields = check.report(llm_type);

    let output_data = CheckOutput {
        llm_type,
        api_type: llm_type.api_type(),
        ok: !fields.iter().any(FieldStatus::is_missing),
        fields,
    };
    output(&output_data, json_mode);

    check.validate(llm_type)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::MissingCredentialError;

    fn args(embedding: bool, llm_type: Option<LlmType>) -> CheckArgs {
        CheckArgs { embedding, llm_type }
    }

    #[test]
    fn test_llm_type_selection() {
        let config = Config::default();
        assert_eq!(args(false, None).resolve_llm_type(&config), LlmType::OpenaiChat);
        assert_eq!(args(true, None).resolve_llm_type(&config), LlmType::OpenaiEmbedding);
        assert_eq!(
            args(true, Some(LlmType::AzureOpenaiChat)).resolve_llm_type(&config),
            LlmType::AzureOpenaiChat
        );
    }

    #[test]
    fn test_execute_fails_with_missing_credential() {
        let check = CredentialCheck::new(CredentialResolver::new(|_| None));
        let err = execute_with(&args(true, None), &Config::default(), true, &check).unwrap_err();

        let missing = err.downcast_ref::<MissingCredentialError>().unwrap();
        assert_eq!(missing, &MissingCredentialError::api_key(true));
    }

    #[test]
    fn test_execute_succeeds_when_configured() {
        let check = CredentialCheck::new(CredentialResolver::new(|name| {
            (name == "GRAPHRAG_API_KEY").then(|| "k".to_string())
        }));
        assert!(execute_with(&args(false, None), &Config::default(), true, &check).is_ok());
    }
}

use std::env;
use std::fs;
use std::path::Path;

use secrecy::ExposeSecret;
use shopfront_core::config::default_config_path;
use toml::Value;

use crate::commands::{load_config, CommandResult};

struct Field<'a> {
    key_path: &'a str,
    value: String,
    env_keys: &'a [&'a str],
}

/// Renders the effective config as plain text. An invalid config yields the
/// JSON failure payload and the config exit code instead.
pub fn run() -> CommandResult {
    let config = match load_config("config") {
        Ok(config) => config,
        Err(result) => return result,
    };

    let config_file_path = default_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let api_token = match &config.catalog.api_token {
        Some(token) => redact_token(token.expose_secret()),
        None => "<unset>".to_string(),
    };

    let fields = [
        Field {
            key_path: "catalog.source",
            value: format!("{:?}", config.catalog.source),
            env_keys: &["SHOPFRONT_CATALOG_SOURCE"],
        },
        Field {
            key_path: "catalog.base_url",
            value: config.catalog.base_url.clone(),
            env_keys: &["SHOPFRONT_CATALOG_BASE_URL"],
        },
        Field {
            key_path: "catalog.path",
            value: config
                .catalog
                .path
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "<unset>".to_string()),
            env_keys: &["SHOPFRONT_CATALOG_PATH"],
        },
        Field {
            key_path: "catalog.api_token",
            value: api_token,
            env_keys: &["SHOPFRONT_CATALOG_API_TOKEN"],
        },
        Field {
            key_path: "catalog.timeout_secs",
            value: config.catalog.timeout_secs.to_string(),
            env_keys: &["SHOPFRONT_CATALOG_TIMEOUT_SECS"],
        },
        Field {
            key_path: "search.page_size",
            value: config.search.page_size.to_string(),
            env_keys: &["SHOPFRONT_SEARCH_PAGE_SIZE"],
        },
        Field {
            key_path: "recommend.max_offers",
            value: config.recommend.max_offers.to_string(),
            env_keys: &["SHOPFRONT_RECOMMEND_MAX_OFFERS"],
        },
        Field {
            key_path: "recommend.adjacency",
            value: format!("{} categories", config.recommend.adjacency.len()),
            env_keys: &[],
        },
        Field {
            key_path: "logging.level",
            value: config.logging.level.clone(),
            env_keys: &["SHOPFRONT_LOGGING_LEVEL", "SHOPFRONT_LOG_LEVEL"],
        },
        Field {
            key_path: "logging.format",
            value: format!("{:?}", config.logging.format),
            env_keys: &["SHOPFRONT_LOGGING_FORMAT", "SHOPFRONT_LOG_FORMAT"],
        },
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for field in fields {
        let source = field_source(
            field.key_path,
            field.env_keys,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        lines.push(render_line(field.key_path, &field.value, source));
    }

    CommandResult { exit_code: 0, output: lines.join("\n") }
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

fn redact_token(token: &str) -> String {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    let prefix: String = trimmed.chars().take(4).collect();
    if trimmed.chars().count() > 8 {
        return format!("{prefix}***");
    }

    "<redacted>".to_string()
}

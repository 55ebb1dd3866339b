use serde::{Deserialize, Deserializer};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub cron: Option<CronConfig>,
    #[serde(default)]
    pub backup: Option<BackupConfig>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CronConfig {
    #[serde(default)]
    pub schedule: Option<String>,
    #[serde(default)]
    pub daily_time: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct BackupConfig {
    #[serde(default, deserialize_with = "list_or_csv")]
    pub sources: Vec<String>,
    #[serde(default)]
    pub target: String,
    #[serde(default, deserialize_with = "list_or_csv")]
    pub recipients: Vec<String>,
    #[serde(default)]
    pub report_dir: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListOrCsv {
    Csv(String),
    List(Vec<String>),
}

/// Accepts either `"a,b"` or a YAML sequence; entries are trimmed and blanks dropped.
fn list_or_csv<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Option::<ListOrCsv>::deserialize(deserializer)? {
        Some(ListOrCsv::Csv(value)) => split_list(&value),
        Some(ListOrCsv::List(values)) => values
            .iter()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect(),
        None => Vec::new(),
    };
    Ok(raw)
}

pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(|item| item.to_string())
        .collect()
}

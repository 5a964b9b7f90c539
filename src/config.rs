use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;

use tracing::warn;

pub const DEFAULT_API_URL: &str =
    "https://ark.cn-beijing.volces.com/api/v3/images/generations";
pub const DEFAULT_MODEL_NAME: &str = "doubao-seedream-4-0-250828";
pub const DEFAULT_SIZE: &str = "2048x2048";
pub const DEFAULT_WATERMARK: bool = false;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 60;

const CONFIG_FILE_NAME: &str = "config.env";

#[derive(Debug, Clone)]
pub struct Config {
    pub ark_api_key: String,
    pub ark_api_url: String,
    pub model_name: String,
    pub output_dir: PathBuf,
    pub reference_dir: PathBuf,
    pub default_size: String,
    pub default_watermark: bool,
    pub request_timeout_seconds: u64,
    pub log_level: String,
}

fn config_dir() -> PathBuf {
    if let Ok(dir) = env::var("JIMENG_CONFIG_DIR") {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".jimeng-selfie")
}

fn load_config_file() -> HashMap<String, String> {
    let mut values = HashMap::new();
    let path = config_dir().join(CONFIG_FILE_NAME);
    if !path.exists() {
        return values;
    }

    let raw = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) => {
            warn!("Failed to read config file {}: {}", path.display(), err);
            return values;
        }
    };

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim().to_string();
        let value = value
            .trim()
            .trim_matches('"')
            .trim_matches('\'')
            .to_string();
        values.insert(key, value);
    }

    values
}

fn resolve(file_values: &HashMap<String, String>, key: &str, default: &str) -> String {
    if let Ok(value) = env::var(key) {
        if !value.is_empty() {
            return value;
        }
    }
    file_values
        .get(key)
        .cloned()
        .unwrap_or_else(|| default.to_string())
}

fn resolve_u64(file_values: &HashMap<String, String>, key: &str, default: u64) -> u64 {
    resolve(file_values, key, "")
        .parse::<u64>()
        .unwrap_or(default)
}

fn resolve_bool(file_values: &HashMap<String, String>, key: &str, default: bool) -> bool {
    let value = resolve(file_values, key, "");
    if value.trim().is_empty() {
        return default;
    }
    value.trim().eq_ignore_ascii_case("true")
}

impl Config {
    pub fn load() -> Self {
        let file_values = load_config_file();

        let output_dir = match resolve(&file_values, "OUTPUT_DIR", "").as_str() {
            "" => PathBuf::from("output"),
            dir => PathBuf::from(dir),
        };
        let reference_dir = match resolve(&file_values, "REFERENCE_DIR", "").as_str() {
            "" => PathBuf::from("reference_images"),
            dir => PathBuf::from(dir),
        };

        Config {
            ark_api_key: resolve(&file_values, "ARK_API_KEY", ""),
            ark_api_url: resolve(&file_values, "ARK_API_URL", DEFAULT_API_URL),
            model_name: resolve(&file_values, "MODEL_NAME", DEFAULT_MODEL_NAME),
            output_dir,
            reference_dir,
            default_size: resolve(&file_values, "DEFAULT_SIZE", DEFAULT_SIZE),
            default_watermark: resolve_bool(&file_values, "DEFAULT_WATERMARK", DEFAULT_WATERMARK),
            request_timeout_seconds: resolve_u64(
                &file_values,
                "REQUEST_TIMEOUT_SECONDS",
                DEFAULT_TIMEOUT_SECONDS,
            ),
            log_level: resolve(&file_values, "LOG_LEVEL", "info").to_lowercase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn config_file_lines_parse_with_comments_and_quotes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "# comment line").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "ARK_API_KEY=\"quoted-key\"").unwrap();
        writeln!(file, "MODEL_NAME='single-quoted'").unwrap();
        writeln!(file, "not a key value line").unwrap();
        drop(file);

        env::set_var("JIMENG_CONFIG_DIR", dir.path());
        let values = load_config_file();
        env::remove_var("JIMENG_CONFIG_DIR");

        assert_eq!(values.get("ARK_API_KEY").map(String::as_str), Some("quoted-key"));
        assert_eq!(values.get("MODEL_NAME").map(String::as_str), Some("single-quoted"));
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn environment_overrides_file_values() {
        let mut file_values = HashMap::new();
        file_values.insert("JIMENG_TEST_ONLY_KEY".to_string(), "from-file".to_string());

        assert_eq!(
            resolve(&file_values, "JIMENG_TEST_ONLY_KEY", "default"),
            "from-file"
        );

        env::set_var("JIMENG_TEST_ONLY_KEY", "from-env");
        assert_eq!(
            resolve(&file_values, "JIMENG_TEST_ONLY_KEY", "default"),
            "from-env"
        );
        env::remove_var("JIMENG_TEST_ONLY_KEY");
    }

    #[test]
    fn missing_key_falls_back_to_default() {
        let file_values = HashMap::new();
        assert_eq!(
            resolve(&file_values, "JIMENG_TEST_ABSENT", "fallback"),
            "fallback"
        );
        assert_eq!(resolve_u64(&file_values, "JIMENG_TEST_ABSENT", 60), 60);
        assert!(!resolve_bool(&file_values, "JIMENG_TEST_ABSENT", false));
    }
}

use std::str::FromStr;

/// アプリケーション設定
///
/// 環境変数から読み込む。不正な値は警告を出して既定値に戻す。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// 待ち受けアドレス（`BIND_ADDRESS`）
    pub bind_address: String,
    /// 待ち受けポート（`PORT`）
    pub port: u16,
    /// 起動時にデモデータを読み込むか（`LIBRARY_SEED_DEMO_DATA`）
    pub seed_demo_data: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 3000,
            seed_demo_data: true,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意の参照関数から読み込む（テスト用に環境変数を差し替えられる）
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            bind_address: lookup("BIND_ADDRESS")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.bind_address),
            port: parse_or("PORT", lookup("PORT"), defaults.port),
            seed_demo_data: lookup("LIBRARY_SEED_DEMO_DATA")
                .map(|v| parse_flag(&v, defaults.seed_demo_data))
                .unwrap_or(defaults.seed_demo_data),
        }
    }

    /// `bind_address:port`
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

fn parse_or<T: FromStr + Copy>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        None => default,
        Some(v) => v.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid value for {}: {:?}, using default", key, v);
            default
        }),
    }
}

fn parse_flag(raw: &str, default: bool) -> bool {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        other => {
            tracing::warn!(
                "Invalid value for LIBRARY_SEED_DEMO_DATA: {:?}, using default",
                other
            );
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.listen_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn test_reads_values() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("BIND_ADDRESS", "127.0.0.1"),
            ("PORT", "8080"),
            ("LIBRARY_SEED_DEMO_DATA", "off"),
        ]));
        assert_eq!(config.listen_addr(), "127.0.0.1:8080");
        assert!(!config.seed_demo_data);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("PORT", "not-a-port"),
            ("LIBRARY_SEED_DEMO_DATA", "maybe"),
        ]));
        assert_eq!(config.port, 3000);
        assert!(config.seed_demo_data);
    }
}

use std::env;
use std::path::PathBuf;

/// ドキュメントストアとプロセス起動の設定を管理する構造体
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub data_file: PathBuf,
    pub logs_dir: PathBuf,
    pub io_timeout_secs: u64,
    pub bind_addr: String,
}

/// 設定エラー
#[derive(Debug)]
pub enum ConfigError {
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl StoreConfig {
    /// 環境変数から設定を読み取る
    /// 環境変数が設定されていない場合はデフォルト値を使用
    pub fn from_env() -> Result<Self, ConfigError> {
        let data_file = env::var("BLOODBANK_DATA_FILE")
            .unwrap_or_else(|_| "data/mockdb.json".to_string())
            .into();

        let logs_dir = env::var("BLOODBANK_LOGS_DIR")
            .unwrap_or_else(|_| "logs".to_string())
            .into();

        let io_timeout_secs = env::var("BLOODBANK_IO_TIMEOUT_SECS")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidValue(format!("Invalid BLOODBANK_IO_TIMEOUT_SECS: {}", e))
            })?;

        let bind_addr =
            env::var("BLOODBANK_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        Ok(Self {
            data_file,
            logs_dir,
            io_timeout_secs,
            bind_addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // テスト間の環境変数の競合を防ぐためのロック
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_from_env_with_all_variables() {
        let _lock = ENV_LOCK.lock().unwrap();

        // 環境変数を設定
        env::set_var("BLOODBANK_DATA_FILE", "/tmp/testdb.json");
        env::set_var("BLOODBANK_LOGS_DIR", "/tmp/testlogs");
        env::set_var("BLOODBANK_IO_TIMEOUT_SECS", "9");
        env::set_var("BLOODBANK_BIND_ADDR", "127.0.0.1:8080");

        let config = StoreConfig::from_env().unwrap();

        assert_eq!(config.data_file, PathBuf::from("/tmp/testdb.json"));
        assert_eq!(config.logs_dir, PathBuf::from("/tmp/testlogs"));
        assert_eq!(config.io_timeout_secs, 9);
        assert_eq!(config.bind_addr, "127.0.0.1:8080");

        // クリーンアップ
        env::remove_var("BLOODBANK_DATA_FILE");
        env::remove_var("BLOODBANK_LOGS_DIR");
        env::remove_var("BLOODBANK_IO_TIMEOUT_SECS");
        env::remove_var("BLOODBANK_BIND_ADDR");
    }

    #[test]
    fn test_from_env_with_defaults() {
        let _lock = ENV_LOCK.lock().unwrap();

        // 環境変数をクリア
        env::remove_var("BLOODBANK_DATA_FILE");
        env::remove_var("BLOODBANK_LOGS_DIR");
        env::remove_var("BLOODBANK_IO_TIMEOUT_SECS");
        env::remove_var("BLOODBANK_BIND_ADDR");

        let config = StoreConfig::from_env().unwrap();

        assert_eq!(config.data_file, PathBuf::from("data/mockdb.json"));
        assert_eq!(config.logs_dir, PathBuf::from("logs"));
        assert_eq!(config.io_timeout_secs, 5);
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
    }

    #[test]
    fn test_invalid_io_timeout() {
        let _lock = ENV_LOCK.lock().unwrap();

        env::set_var("BLOODBANK_IO_TIMEOUT_SECS", "invalid");

        let result = StoreConfig::from_env();
        assert!(result.is_err());

        env::remove_var("BLOODBANK_IO_TIMEOUT_SECS");
    }
}

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub allocation: AllocationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_concurrent_requests: usize, // 同时处理的请求上限 (分配为 CPU 密集计算)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub slow_statement_secs: u64,   // 慢查询日志阈值
}

/// 分配引擎配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationConfig {
    pub reporting_currency: String,    // 报告币种
    pub reference_currency: String,    // 中转参考币种 (公司本位币)
    pub parallel_pool_threshold: usize, // 分配池数量达到该值时并行计算
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            reporting_currency: "USD".to_string(),
            reference_currency: "EUR".to_string(),
            parallel_pool_threshold: 32,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                max_concurrent_requests: 16,
            },
            database: DatabaseConfig {
                url: "postgres://localhost/stock_allocation".to_string(),
                max_connections: 8,
                acquire_timeout_secs: 10,
                slow_statement_secs: 10,
            },
            allocation: AllocationConfig::default(),
        }
    }
}

impl AppConfig {
    /// 加载配置
    ///
    /// 优先级 (低 -> 高): 默认值, config/allocation.toml, ALLOC__* 环境变量,
    /// SERVER_HOST / SERVER_PORT / DATABASE_URL
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config/allocation")
    }

    pub fn load_from(file: &str) -> Result<Self, ConfigError> {
        let defaults = AppConfig::default();

        Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", defaults.server.port as u64)?
            .set_default(
                "server.max_concurrent_requests",
                defaults.server.max_concurrent_requests as u64,
            )?
            .set_default("database.url", defaults.database.url)?
            .set_default("database.max_connections", u64::from(defaults.database.max_connections))?
            .set_default("database.acquire_timeout_secs", defaults.database.acquire_timeout_secs)?
            .set_default("database.slow_statement_secs", defaults.database.slow_statement_secs)?
            .set_default("allocation.reporting_currency", defaults.allocation.reporting_currency)?
            .set_default("allocation.reference_currency", defaults.allocation.reference_currency)?
            .set_default(
                "allocation.parallel_pool_threshold",
                defaults.allocation.parallel_pool_threshold as u64,
            )?
            .add_source(File::with_name(file).required(false))
            .add_source(
                Environment::with_prefix("ALLOC")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option(
                "server.port",
                std::env::var("SERVER_PORT")
                    .ok()
                    .and_then(|p| p.parse::<u16>().ok())
                    .map(u64::from),
            )?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .build()?
            .try_deserialize()
    }
}

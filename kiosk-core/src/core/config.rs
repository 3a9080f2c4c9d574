use crate::gesture::SwipeConfig;
use crate::navigation::NavPolicy;
use crate::watchdog::{MAX_TIMEOUT_MS, WatchdogConfig};
use rust_decimal::Decimal;
use shared::error::{KioskError, KioskResult};
use shared::models::Locale;
use std::str::FromStr;

/// 终端配置 - 自助点餐终端的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖（`.env` 文件由 main 通过 dotenv 加载）：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | KIOSK_IDLE_TIMEOUT_MS | 60000 | 无操作多久后弹出提示(毫秒，最长 24 小时) |
/// | KIOSK_WARNING_TIMEOUT_MS | 30000 | 提示倒计时长度(毫秒，最长 24 小时) |
/// | KIOSK_TAX_RATE | 0.10 | 税率 |
/// | KIOSK_DEFAULT_LOCALE | en | 默认语言 (en / fr / nl) |
/// | KIOSK_SKIP_INTRO | false | 跳过欢迎页和就餐方式页 |
/// | KIOSK_NAV_POLICY | gated | 空购物车时的导航策略 (gated / ungated) |
/// | KIOSK_PAYMENT_DELAY_MS | 2000 | 模拟支付耗时(毫秒) |
/// | KIOSK_CATALOG_PATH | - | 菜单 JSON 文件，未设置时使用内置菜单 |
/// | KIOSK_TRANSLATIONS_PATH | - | 翻译 JSON 文件，覆盖内置文本 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | JSON 格式日志 |
/// | LOG_DIR | - | 日志目录，未设置时只输出到控制台 |
///
/// # 示例
///
/// ```ignore
/// KIOSK_SKIP_INTRO=true KIOSK_IDLE_TIMEOUT_MS=15000 cargo run -p kiosk-core
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// 空闲超时 + 提示倒计时
    pub watchdog: WatchdogConfig,
    /// 税率 (0.10 = 10%)
    pub tax_rate: Decimal,
    pub default_locale: Locale,
    /// 跳过欢迎页 / 就餐方式页，直接从菜单开始
    pub skip_intro: bool,
    pub nav_policy: NavPolicy,
    pub payment_delay_ms: u64,
    pub catalog_path: Option<String>,
    pub translations_path: Option<String>,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
    /// 滑动手势阈值 (不从环境变量读取)
    pub swipe: SwipeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            watchdog: WatchdogConfig::default(),
            tax_rate: Decimal::new(10, 2),
            default_locale: Locale::En,
            skip_intro: false,
            nav_policy: NavPolicy::Gated,
            payment_delay_ms: 2_000,
            catalog_path: None,
            translations_path: None,
            log_level: "info".into(),
            log_json: false,
            log_dir: None,
            swipe: SwipeConfig::default(),
        }
    }
}

fn parse<T: FromStr>(key: &str, raw: Option<String>, default: T) -> KioskResult<T> {
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| KioskError::InvalidConfig {
            key: key.to_string(),
            value,
        }),
    }
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 未设置的变量使用默认值；无法解析的值返回 `InvalidConfig`
    pub fn from_env() -> KioskResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意 key → value 来源加载配置
    ///
    /// 常用于测试场景
    pub fn from_lookup<F>(lookup: F) -> KioskResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();
        let config = Self {
            watchdog: WatchdogConfig {
                idle_timeout_ms: parse(
                    "KIOSK_IDLE_TIMEOUT_MS",
                    lookup("KIOSK_IDLE_TIMEOUT_MS"),
                    d.watchdog.idle_timeout_ms,
                )?,
                warning_timeout_ms: parse(
                    "KIOSK_WARNING_TIMEOUT_MS",
                    lookup("KIOSK_WARNING_TIMEOUT_MS"),
                    d.watchdog.warning_timeout_ms,
                )?,
            },
            tax_rate: parse("KIOSK_TAX_RATE", lookup("KIOSK_TAX_RATE"), d.tax_rate)?,
            default_locale: parse(
                "KIOSK_DEFAULT_LOCALE",
                lookup("KIOSK_DEFAULT_LOCALE"),
                d.default_locale,
            )?,
            skip_intro: parse("KIOSK_SKIP_INTRO", lookup("KIOSK_SKIP_INTRO"), d.skip_intro)?,
            nav_policy: parse("KIOSK_NAV_POLICY", lookup("KIOSK_NAV_POLICY"), d.nav_policy)?,
            payment_delay_ms: parse(
                "KIOSK_PAYMENT_DELAY_MS",
                lookup("KIOSK_PAYMENT_DELAY_MS"),
                d.payment_delay_ms,
            )?,
            catalog_path: lookup("KIOSK_CATALOG_PATH").filter(|p| !p.trim().is_empty()),
            translations_path: lookup("KIOSK_TRANSLATIONS_PATH").filter(|p| !p.trim().is_empty()),
            log_level: lookup("LOG_LEVEL").unwrap_or(d.log_level),
            log_json: parse("LOG_JSON", lookup("LOG_JSON"), d.log_json)?,
            log_dir: lookup("LOG_DIR").filter(|p| !p.trim().is_empty()),
            swipe: d.swipe,
        };
        config.validate()?;
        Ok(config)
    }

    /// 检查取值范围
    pub fn validate(&self) -> KioskResult<()> {
        let invalid = |key: &str, value: String| {
            Err(KioskError::InvalidConfig {
                key: key.to_string(),
                value,
            })
        };
        let in_range = |ms: i64| (1..=MAX_TIMEOUT_MS).contains(&ms);
        if !in_range(self.watchdog.idle_timeout_ms) {
            return invalid(
                "KIOSK_IDLE_TIMEOUT_MS",
                self.watchdog.idle_timeout_ms.to_string(),
            );
        }
        if !in_range(self.watchdog.warning_timeout_ms) {
            return invalid(
                "KIOSK_WARNING_TIMEOUT_MS",
                self.watchdog.warning_timeout_ms.to_string(),
            );
        }
        if self.tax_rate.is_sign_negative() || self.tax_rate > Decimal::ONE {
            return invalid("KIOSK_TAX_RATE", self.tax_rate.to_string());
        }
        Ok(())
    }

    /// 是否显示欢迎页 / 就餐方式页
    pub fn intro_enabled(&self) -> bool {
        !self.skip_intro
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> KioskResult<Config> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_env() {
        let config = from_pairs(&[]).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.watchdog.idle_timeout_ms, 60_000);
        assert_eq!(config.watchdog.warning_timeout_ms, 30_000);
        assert_eq!(config.tax_rate, Decimal::new(10, 2));
        assert!(config.intro_enabled());
    }

    #[test]
    fn test_overrides() {
        let config = from_pairs(&[
            ("KIOSK_IDLE_TIMEOUT_MS", "15000"),
            ("KIOSK_TAX_RATE", "0.21"),
            ("KIOSK_DEFAULT_LOCALE", "nl"),
            ("KIOSK_SKIP_INTRO", "true"),
            ("KIOSK_NAV_POLICY", "ungated"),
            ("KIOSK_CATALOG_PATH", "data/catalog.json"),
            ("LOG_DIR", ""),
        ])
        .unwrap();
        assert_eq!(config.watchdog.idle_timeout_ms, 15_000);
        assert_eq!(config.tax_rate, Decimal::new(21, 2));
        assert_eq!(config.default_locale, Locale::Nl);
        assert!(!config.intro_enabled());
        assert_eq!(config.nav_policy, NavPolicy::Ungated);
        assert_eq!(config.catalog_path.as_deref(), Some("data/catalog.json"));
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn test_unparsable_value_is_rejected() {
        let err = from_pairs(&[("KIOSK_IDLE_TIMEOUT_MS", "soon")]).unwrap_err();
        assert_eq!(
            err,
            KioskError::InvalidConfig {
                key: "KIOSK_IDLE_TIMEOUT_MS".into(),
                value: "soon".into()
            }
        );
        assert!(from_pairs(&[("KIOSK_DEFAULT_LOCALE", "de")]).is_err());
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        assert!(from_pairs(&[("KIOSK_TAX_RATE", "1.5")]).is_err());
        assert!(from_pairs(&[("KIOSK_TAX_RATE", "-0.1")]).is_err());
        assert!(from_pairs(&[("KIOSK_WARNING_TIMEOUT_MS", "0")]).is_err());
    }

    #[test]
    fn test_timeouts_are_bounded_to_a_day() {
        let huge = i64::MAX.to_string();
        assert_eq!(
            from_pairs(&[("KIOSK_IDLE_TIMEOUT_MS", huge.as_str())]).unwrap_err(),
            KioskError::InvalidConfig {
                key: "KIOSK_IDLE_TIMEOUT_MS".into(),
                value: huge.clone(),
            }
        );
        assert!(from_pairs(&[("KIOSK_WARNING_TIMEOUT_MS", huge.as_str())]).is_err());

        let day = MAX_TIMEOUT_MS.to_string();
        let config = from_pairs(&[
            ("KIOSK_IDLE_TIMEOUT_MS", day.as_str()),
            ("KIOSK_WARNING_TIMEOUT_MS", day.as_str()),
        ])
        .unwrap();
        assert_eq!(config.watchdog.idle_timeout_ms, 86_400_000);
        assert!(from_pairs(&[("KIOSK_IDLE_TIMEOUT_MS", "86400001")]).is_err());
    }
}

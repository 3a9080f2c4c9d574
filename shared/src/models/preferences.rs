//! Session display preferences and order type

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 界面语言
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Fr,
    Nl,
}

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::En, Locale::Fr, Locale::Nl];

    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Fr => "fr",
            Locale::Nl => "nl",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "fr" => Ok(Locale::Fr),
            "nl" => Ok(Locale::Nl),
            other => Err(format!("unsupported locale: {other}")),
        }
    }
}

/// 显示主题
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Menu layout
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Grid => ViewMode::List,
            ViewMode::List => ViewMode::Grid,
        }
    }
}

/// Number of tiles per row in grid mode
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GridDensity {
    Compact,
    #[default]
    Comfortable,
    Spacious,
}

impl GridDensity {
    pub fn columns(&self) -> u8 {
        match self {
            GridDensity::Compact => 4,
            GridDensity::Comfortable => 3,
            GridDensity::Spacious => 2,
        }
    }
}

/// 用餐方式
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    /// 堂食
    DineIn,
    /// 外带
    Takeaway,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_parse() {
        assert_eq!("FR".parse::<Locale>(), Ok(Locale::Fr));
        assert_eq!(" nl ".parse::<Locale>(), Ok(Locale::Nl));
        assert!("de".parse::<Locale>().is_err());
        assert_eq!(Locale::default().to_string(), "en");
    }

    #[test]
    fn test_toggles() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(ViewMode::Grid.toggled(), ViewMode::List);
        assert_eq!(GridDensity::Spacious.columns(), 2);
    }
}

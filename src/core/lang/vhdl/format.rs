use serde_derive::Deserialize;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Fault, LastError};

/// Top-level layout of a configuration file.
#[derive(Debug, PartialEq, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    testbench: Option<TbFormat>,
}

impl FromStr for Config {
    type Err = toml::de::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        toml::from_str(s)
    }
}

impl Config {
    /// Reads and parses a configuration file.
    pub fn from_file(path: &Path) -> Result<Self, Fault> {
        let unreadable = |e: String| Error::ConfigUnreadable(path.to_path_buf(), LastError(e));
        let contents = std::fs::read_to_string(path).map_err(|e| unreadable(e.to_string()))?;
        Ok(Self::from_str(&contents).map_err(|e| unreadable(e.to_string()))?)
    }

    /// Takes the testbench formatting, falling back to the built-in defaults
    /// for anything left unset.
    pub fn into_format(self) -> TbFormat {
        let mut fmt = self.testbench.unwrap_or_default();
        fmt.merge(Some(TbFormat::new()));
        fmt
    }
}

#[derive(Debug, PartialEq, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct TbFormat {
    #[serde(rename = "hard-tabs")]
    hard_tabs: Option<bool>,
    #[serde(rename = "tab-size")]
    tab_size: Option<u8>,
    #[serde(rename = "instance-name")]
    instance_name: Option<String>,
    #[serde(rename = "architecture-name")]
    architecture_name: Option<String>,
}

impl TbFormat {
    pub fn new() -> Self {
        Self {
            hard_tabs: Some(true),
            tab_size: Some(4),
            instance_name: Some(String::from("uut")),
            architecture_name: Some(String::from("behavior")),
        }
    }

    pub fn is_hard_tabs(&self) -> bool {
        self.hard_tabs.unwrap_or(true)
    }

    pub fn get_tab_size(&self) -> u8 {
        self.tab_size.unwrap_or(4)
    }

    /// Returns the text for `depth` levels of indentation.
    pub fn indent(&self, depth: usize) -> String {
        match self.is_hard_tabs() {
            true => "\t".repeat(depth),
            false => " ".repeat(depth * self.get_tab_size() as usize),
        }
    }

    pub fn get_instance_name(&self) -> &str {
        self.instance_name.as_deref().unwrap_or("uut")
    }

    pub fn get_architecture_name(&self) -> &str {
        self.architecture_name.as_deref().unwrap_or("behavior")
    }

    /// Merges any populated data from `rhs` into attributes that do not already
    /// have data defined in `self`.
    pub fn merge(&mut self, rhs: Option<Self>) -> () {
        if let Some(rhs) = rhs {
            if self.hard_tabs.is_some() == false {
                self.hard_tabs = rhs.hard_tabs
            }
            if self.tab_size.is_some() == false {
                self.tab_size = rhs.tab_size
            }
            if self.instance_name.is_some() == false {
                self.instance_name = rhs.instance_name
            }
            if self.architecture_name.is_some() == false {
                self.architecture_name = rhs.architecture_name
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const C_0: &str = r#"
# A blank configuration file.
"#;

    const C_1: &str = r#"
[testbench]
hard-tabs = false
tab-size = 2
instance-name = "dut"
"#;

    #[test]
    fn parse_empty_config() {
        let cfg = Config::from_str(C_0).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.into_format(), TbFormat::new());
    }

    #[test]
    fn parse_basic_config() {
        let fmt = Config::from_str(C_1).unwrap().into_format();
        assert_eq!(fmt.is_hard_tabs(), false);
        assert_eq!(fmt.indent(2), "    ");
        assert_eq!(fmt.get_instance_name(), "dut");
        // left unset
        assert_eq!(fmt.get_architecture_name(), "behavior");
    }

    #[test]
    fn reject_unknown_keys() {
        assert!(Config::from_str("[testbench]\ncolor = true\n").is_err());
        assert!(Config::from_str("tab-size = 3\n").is_err());
    }

    #[test]
    fn default_indent_is_tabs() {
        assert_eq!(TbFormat::new().indent(1), "\t");
        assert_eq!(TbFormat::new().indent(2), "\t\t");
        assert_eq!(TbFormat::default().indent(0), "");
    }

    #[test]
    fn read_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tbgen.toml");
        std::fs::write(&path, C_1).unwrap();
        let fmt = Config::from_file(&path).unwrap().into_format();
        assert_eq!(fmt.get_instance_name(), "dut");

        let missing = dir.path().join("missing.toml");
        assert!(Config::from_file(&missing).is_err());
    }
}

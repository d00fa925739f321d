mod run;

use crate::{checker::CheckerConfig, error::HostsError, hosts, output::OutputFormat};
use std::path::PathBuf;

/// Where the hosts to check come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostsSource {
    /// YAML file with a `hosts` list
    File(PathBuf),
    /// Comma-separated list given on the command line
    List(String),
}

impl HostsSource {
    /// # Errors
    ///
    /// Returns an error if the file or list is empty, unreadable or holds an
    /// invalid host
    pub async fn load(&self) -> Result<Vec<String>, HostsError> {
        match self {
            Self::File(path) => hosts::load_file(path).await,
            Self::List(list) => hosts::from_list(list),
        }
    }
}

/// Action enum representing each possible command
#[derive(Debug)]
pub enum Action {
    Check {
        hosts: HostsSource,
        checker: CheckerConfig,
        format: OutputFormat,
    },
}

impl Action {
    /// Execute the action
    ///
    /// # Errors
    ///
    /// Returns an error if the action fails to execute
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}

use std::path::PathBuf;

use crate::patch::{InputFormat, LengthPolicy};

/// Configuration for one replacement session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Executable to hold suspended and copy before patching
    pub target: PathBuf,
    /// Directory the destination file name is resolved against
    pub output_dir: PathBuf,
    pub length_policy: LengthPolicy,
    pub input_format: InputFormat,
}

impl SessionConfig {
    pub fn new<P: Into<PathBuf>>(target: P) -> Self {
        Self::builder(target).build()
    }

    /// Create a new configuration builder
    pub fn builder<P: Into<PathBuf>>(target: P) -> SessionConfigBuilder {
        SessionConfigBuilder {
            target: target.into(),
            output_dir: None,
            length_policy: None,
            input_format: None,
        }
    }
}

/// Builder for SessionConfig
#[derive(Debug, Clone)]
pub struct SessionConfigBuilder {
    target: PathBuf,
    output_dir: Option<PathBuf>,
    length_policy: Option<LengthPolicy>,
    input_format: Option<InputFormat>,
}

impl SessionConfigBuilder {
    /// Set the directory saved files are written to
    pub fn output_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    pub fn length_policy(mut self, policy: LengthPolicy) -> Self {
        self.length_policy = Some(policy);
        self
    }

    pub fn input_format(mut self, format: InputFormat) -> Self {
        self.input_format = Some(format);
        self
    }

    /// Build the configuration
    pub fn build(self) -> SessionConfig {
        SessionConfig {
            target: self.target,
            output_dir: self.output_dir.unwrap_or_else(|| PathBuf::from(".")),
            length_policy: self.length_policy.unwrap_or_default(),
            input_format: self.input_format.unwrap_or_default(),
        }
    }
}

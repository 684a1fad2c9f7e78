//! Error types for launch assembly

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("Package '{0}' not found. Ensure the package is installed and sourced.")]
    PackageNotFound(String),

    #[error("Missing required launch argument '{0}'. Pass it as {0}:=<value>.")]
    MissingArgument(String),

    #[error("Robot description template expansion failed: {0}")]
    TemplateExpansion(#[from] TemplateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("XML parsing error in {file}: {source}")]
    Xml {
        file: String,
        #[source]
        source: roxmltree::Error,
    },

    #[error("Undefined property '${{{name}}}' in {file}")]
    UndefinedProperty { name: String, file: String },

    #[error("Undefined macro '<xacro:{name}>' in {file}")]
    UndefinedMacro { name: String, file: String },

    #[error("Missing parameter '{param}' for macro '<xacro:{name}>'")]
    MissingMacroParameter { name: String, param: String },

    #[error("Undefined argument '$(arg {name})' in {file}. Did you forget to declare it with <xacro:arg>?")]
    UndefinedArgument { name: String, file: String },

    #[error("Missing required attribute '{attribute}' on element '<{element}>'")]
    MissingAttribute { element: String, attribute: String },

    #[error("Invalid condition value '{value}' for '<{element}>' (expected true/false/1/0)")]
    InvalidCondition { element: String, value: String },

    #[error("Unterminated substitution in '{0}'")]
    UnterminatedSubstitution(String),

    #[error("Unsupported substitution '$({0})' (only 'arg' is available in templates)")]
    UnsupportedSubstitution(String),

    #[error("Unsupported template feature {feature} in {file}")]
    Unsupported { feature: String, file: String },

    #[error("Template must expand to exactly one root element, got {0}")]
    MultipleRoots(usize),

    #[error("IO error reading {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, AssemblyError>;

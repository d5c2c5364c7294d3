//! Parameter files in TOML, YAML or JSON.

use anyhow::{Context, Result};
use flex_core::{FlexError, ParameterInputs};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Serialization formats accepted for parameter files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamFormat {
    Toml,
    Yaml,
    Json,
}

impl ParamFormat {
    /// Format implied by the file extension, if any.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Some(ParamFormat::Toml),
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Some(ParamFormat::Yaml)
            }
            Some(ext) if ext.eq_ignore_ascii_case("json") => Some(ParamFormat::Json),
            _ => None,
        }
    }
}

pub fn parse_parameters(data: &str, format: ParamFormat) -> Result<ParameterInputs> {
    match format {
        ParamFormat::Toml => toml::from_str(data).context("parsing parameters toml"),
        ParamFormat::Yaml => serde_yaml::from_str(data).context("parsing parameters yaml"),
        ParamFormat::Json => serde_json::from_str(data).context("parsing parameters json"),
    }
}

/// Read [`ParameterInputs`] from a file.
///
/// Unknown extensions are tried as TOML, then YAML, then JSON. Missing
/// fields take their defaults.
pub fn load_parameters(path: &Path) -> Result<ParameterInputs> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading parameter file '{}'", path.display()))?;
    let inputs = match ParamFormat::from_path(path) {
        Some(format) => parse_parameters(&data, format),
        None => parse_parameters(&data, ParamFormat::Toml)
            .or_else(|_| parse_parameters(&data, ParamFormat::Yaml))
            .or_else(|_| parse_parameters(&data, ParamFormat::Json))
            .map_err(|_| {
                anyhow::Error::from(FlexError::Config("not valid toml, yaml or json".to_string()))
            }),
    }
    .with_context(|| format!("loading parameters from '{}'", path.display()))?;
    debug!(path = %path.display(), "loaded parameter file");
    Ok(inputs)
}

/// Render parameter inputs as TOML.
pub fn parameters_to_toml(inputs: &ParameterInputs) -> Result<String> {
    toml::to_string_pretty(inputs).context("serializing parameters to toml")
}

/// The default parameters as TOML, with a header explaining the optional keys.
pub fn parameter_template() -> Result<String> {
    let body = parameters_to_toml(&ParameterInputs::default())?;
    Ok(format!(
        "# Flex settlement parameters. Volumes in MWh, prices in EUR/MWh.\n\
         # Optional keys: e_cons (default round(0.92 * v_da)), p_comp and p_pen\n\
         # (default p_imb), p_recomp (default p_da).\n\n{body}"
    ))
}

pub fn write_parameter_template(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory '{}'", parent.display()))?;
    }
    fs::write(path, parameter_template()?)
        .with_context(|| format!("writing parameter template '{}'", path.display()))?;
    info!(path = %path.display(), "wrote parameter template");
    Ok(())
}

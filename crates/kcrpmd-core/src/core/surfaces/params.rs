use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Physical and switching parameters of one KC-RPMD evaluation.
///
/// - `beta`: inverse temperature (atomic units), must be positive
/// - `eta`: geometric factor conserving the free energy of kinked-pair formation
/// - `a`: kinetic-constraint strength
/// - `b`: sharpness of the auxiliary-coordinate soft walls
/// - `c`: switching width of the kinetic constraint in `beta * K`
/// - `d`: switching width of the free-energy normalization in `beta * K`
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct KcRpmdParams {
    pub beta: f64,
    pub eta: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("invalid value {value} for parameter '{name}': {reason}")]
pub struct InvalidParameter {
    pub name: &'static str,
    pub value: f64,
    pub reason: &'static str,
}

#[derive(Debug, Error)]
pub enum ParamLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Parameter validation failed for '{path}': {source}")]
    Invalid {
        path: String,
        source: InvalidParameter,
    },
}

impl KcRpmdParams {
    pub fn validate(&self) -> Result<(), InvalidParameter> {
        if !(self.beta.is_finite() && self.beta > 0.0) {
            return Err(InvalidParameter {
                name: "beta",
                value: self.beta,
                reason: "inverse temperature must be finite and positive",
            });
        }
        for (name, value) in [
            ("eta", self.eta),
            ("a", self.a),
            ("b", self.b),
            ("c", self.c),
            ("d", self.d),
        ] {
            if !value.is_finite() {
                return Err(InvalidParameter {
                    name,
                    value,
                    reason: "must be finite",
                });
            }
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ParamLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| ParamLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::parse(&content, &path.to_string_lossy())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ParamLoadError> {
        Self::parse(content, "<string>")
    }

    fn parse(content: &str, origin: &str) -> Result<Self, ParamLoadError> {
        let params: Self = toml::from_str(content).map_err(|e| ParamLoadError::Toml {
            path: origin.to_string(),
            source: e,
        })?;
        params.validate().map_err(|e| ParamLoadError::Invalid {
            path: origin.to_string(),
            source: e,
        })?;
        Ok(params)
    }
}

use crate::core::surfaces::params::{InvalidParameter, KcRpmdParams};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error(transparent)]
    Invalid(#[from] InvalidParameter),
}

#[derive(Default)]
pub struct KcRpmdParamsBuilder {
    beta: Option<f64>,
    eta: Option<f64>,
    a: Option<f64>,
    b: Option<f64>,
    c: Option<f64>,
    d: Option<f64>,
}

impl KcRpmdParamsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn beta(mut self, beta: f64) -> Self {
        self.beta = Some(beta);
        self
    }
    pub fn eta(mut self, eta: f64) -> Self {
        self.eta = Some(eta);
        self
    }
    pub fn constraint_strength(mut self, a: f64) -> Self {
        self.a = Some(a);
        self
    }
    pub fn gate_sharpness(mut self, b: f64) -> Self {
        self.b = Some(b);
        self
    }
    pub fn constraint_switch(mut self, c: f64) -> Self {
        self.c = Some(c);
        self
    }
    pub fn normalization_switch(mut self, d: f64) -> Self {
        self.d = Some(d);
        self
    }

    pub fn build(self) -> Result<KcRpmdParams, ConfigError> {
        let params = KcRpmdParams {
            beta: self.beta.ok_or(ConfigError::MissingParameter("beta"))?,
            eta: self.eta.ok_or(ConfigError::MissingParameter("eta"))?,
            a: self.a.ok_or(ConfigError::MissingParameter("a"))?,
            b: self.b.ok_or(ConfigError::MissingParameter("b"))?,
            c: self.c.ok_or(ConfigError::MissingParameter("c"))?,
            d: self.d.ok_or(ConfigError::MissingParameter("d"))?,
        };
        params.validate()?;
        Ok(params)
    }
}

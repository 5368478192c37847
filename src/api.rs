// Postal lookup module: a small blocking HTTP client for the ViaCEP service.
// Input is normalized and validated here so that nothing malformed ever
// reaches the network.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

use crate::error::LookupError;
use crate::model::Address;

/// A Brazilian postal code (CEP): eight characters, separators removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostalCode(String);

impl PostalCode {
    /// Strip '.' and '-' from what the user typed and accept the result only
    /// if exactly eight characters remain. Nothing else is checked.
    pub fn parse(raw: &str) -> Option<Self> {
        let code = normalize(raw);
        if code.chars().count() == 8 {
            Some(PostalCode(code))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Remove the '.' and '-' separators users tend to type (01.310-100).
pub fn normalize(raw: &str) -> String {
    raw.chars().filter(|c| *c != '.' && *c != '-').collect()
}

/// Anything able to turn a postal code into an address.
pub trait PostalLookup {
    fn lookup(&self, code: &PostalCode) -> Result<Address, LookupError>;
}

/// Raw JSON returned by `/ws/{cep}/json/`. Unknown codes come back as
/// `{"erro": true}` (or `"true"`) with status 200.
#[derive(Deserialize, Debug, Default)]
pub struct ViaCepResponse {
    pub cep: Option<String>,
    pub uf: Option<String>,
    pub localidade: Option<String>,
    pub logradouro: Option<String>,
    pub bairro: Option<String>,
    #[serde(default)]
    pub erro: Option<serde_json::Value>,
}

impl ViaCepResponse {
    fn is_error(&self) -> bool {
        match &self.erro {
            None | Some(serde_json::Value::Null) | Some(serde_json::Value::Bool(false)) => false,
            Some(serde_json::Value::String(s)) => s != "false",
            Some(_) => true,
        }
    }

    /// Map the response onto an `Address`. `requested` fills in the code
    /// when the body does not echo it back.
    pub fn into_address(self, requested: &PostalCode) -> Result<Address, LookupError> {
        if self.is_error() {
            return Err(LookupError::NotFound(requested.to_string()));
        }
        let postal_code = self
            .cep
            .map(|cep| cep.replace('-', ""))
            .filter(|cep| !cep.is_empty())
            .unwrap_or_else(|| requested.to_string());
        Ok(Address {
            postal_code,
            state: non_blank(self.uf),
            city: non_blank(self.localidade),
            street: non_blank(self.logradouro),
            neighborhood: non_blank(self.bairro),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Blocking client for the ViaCEP web service.
#[derive(Clone)]
pub struct ViaCepClient {
    client: Client,
    base_url: String,
}

impl ViaCepClient {
    /// Build a client for `base_url` (for example `https://viacep.com.br`).
    /// Requests never time out; a hung service blocks the caller.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ViaCepClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url_for(&self, code: &PostalCode) -> String {
        format!("{}/ws/{}/json/", self.base_url, code)
    }
}

impl PostalLookup for ViaCepClient {
    fn lookup(&self, code: &PostalCode) -> Result<Address, LookupError> {
        let url = self.url_for(code);
        tracing::debug!(%url, "postal lookup");

        let res = self.client.get(&url).send()?;
        if res.status() != StatusCode::OK {
            tracing::warn!(status = %res.status(), %code, "postal lookup rejected");
            return Err(LookupError::Status(res.status()));
        }
        let body: ViaCepResponse = res.json()?;
        body.into_address(code)
    }
}

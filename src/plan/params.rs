//! `${var}` parameter substitution for plan files.

use std::collections::HashMap;

use serde::Deserialize;

use crate::{Error, Result};

/// Runtime parameter values supplied alongside a plan.
#[derive(Debug, Clone, Default)]
pub struct Params {
    values: HashMap<String, String>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value, builder-style.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Parse `key=value` pairs as passed on the command line.
    pub fn from_args(args: &[String]) -> Result<Self> {
        args.iter().try_fold(Self::new(), |acc, arg| {
            match arg.split_once('=') {
                Some((key, value)) => Ok(acc.set(key, value)),
                None => Err(Error::Plan(format!(
                    "parameter '{arg}' is not of the form key=value"
                ))),
            }
        })
    }
}

/// Declaration of a parameter a plan accepts.
#[derive(Debug, Clone, Deserialize)]
pub struct ParamDef {
    /// Loading fails when a required parameter has no value and no default.
    #[serde(default)]
    pub required: bool,

    /// Value used when none is supplied.
    pub default: Option<String>,

    /// Shown by `--check`.
    pub description: Option<String>,
}

/// Resolve every `${var}` in `template`.
///
/// Lookup order: supplied params, then the definition's default. A required
/// parameter with neither is an error; an undeclared `${var}` is left alone
/// so downstream consumers can do their own expansion.
pub fn substitute(
    template: &str,
    params: &Params,
    defs: &HashMap<String, ParamDef>,
) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("${") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let Some(close) = after.find('}') else {
            // Unterminated reference: keep the tail verbatim.
            out.push_str(&rest[open..]);
            rest = "";
            break;
        };
        let name = &after[..close];

        if let Some(value) = params.get(name) {
            out.push_str(value);
        } else if let Some(def) = defs.get(name) {
            match (&def.default, def.required) {
                (Some(default), _) => out.push_str(default),
                (None, true) => {
                    return Err(Error::Plan(format!("missing required parameter '{name}'")))
                }
                (None, false) => {}
            }
        } else {
            out.push_str(&rest[open..open + 2 + close + 1]);
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Walk a YAML document substituting params in every string scalar.
pub fn substitute_value(
    value: &mut serde_yaml::Value,
    params: &Params,
    defs: &HashMap<String, ParamDef>,
) -> Result<()> {
    match value {
        serde_yaml::Value::String(s) => *s = substitute(s, params, defs)?,
        serde_yaml::Value::Mapping(map) => {
            for (_, v) in map.iter_mut() {
                substitute_value(v, params, defs)?;
            }
        }
        serde_yaml::Value::Sequence(seq) => {
            for v in seq.iter_mut() {
                substitute_value(v, params, defs)?;
            }
        }
        _ => {}
    }
    Ok(())
}

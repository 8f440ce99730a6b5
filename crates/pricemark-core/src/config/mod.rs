use crate::currency::{CurrencyTable, DEFAULT_SYMBOL, STANDARD_CODES, STANDARD_GLYPHS};
use crate::marker::Marker;
use crate::{Error, Result};
use indexmap::IndexMap;
use serde_json::{Map, Value, json};

/// JSON-backed configuration with dotted-path access (`currency.default`, `slots.cart`, ...).
///
/// [`PriceConfig::default`] carries the built-in defaults; [`PriceConfig::from_json_str`] layers
/// user overrides on top of them.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceConfig(Value);

impl Default for PriceConfig {
    fn default() -> Self {
        let codes: Map<String, Value> = STANDARD_CODES
            .iter()
            .map(|(code, symbol)| (code.to_string(), Value::String(symbol.to_string())))
            .collect();

        Self(json!({
            "currency": {
                "glyphs": STANDARD_GLYPHS,
                "codes": codes,
                "default": DEFAULT_SYMBOL,
            },
            "slots": {
                "main": "[data-product-price]",
                "compare": ".price-compare",
                "cart": "[data-cart-price]",
            },
            "subscription": {
                "option": ".subscription-option",
            },
            "delivery": {
                "container": "[data-delivery-days]",
                "containerClass": "product-availability",
                "target": ".delivery-date",
            },
        }))
    }
}

impl PriceConfig {
    /// Parses a JSON object and layers it onto the defaults.
    ///
    /// Nested objects merge key by key; any other value (arrays included) replaces the default.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let overrides: Value = serde_json::from_str(text).map_err(|e| Error::InvalidConfig {
            key: "<root>".to_string(),
            message: e.to_string(),
        })?;
        if !overrides.is_object() {
            return Err(Error::InvalidConfig {
                key: "<root>".to_string(),
                message: format!("expected an object, got {overrides}"),
            });
        }
        let mut cfg = Self::default();
        merge_into(&mut cfg.0, &overrides);
        Ok(cfg)
    }

    pub fn get(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_str(&self, dotted_path: &str) -> Option<&str> {
        self.get(dotted_path)?.as_str()
    }

    /// Builds the currency table from `currency.glyphs`, `currency.codes` and `currency.default`.
    ///
    /// Missing keys fall back to the built-in entries; `currency.codes` keeps its JSON key order,
    /// which is also the scan order.
    pub fn currency_table(&self) -> Result<CurrencyTable> {
        let glyphs: Vec<String> = match self.get("currency.glyphs") {
            None => STANDARD_GLYPHS.iter().map(|g| g.to_string()).collect(),
            Some(value) => {
                serde_json::from_value(value.clone()).map_err(|e| Error::InvalidConfig {
                    key: "currency.glyphs".to_string(),
                    message: e.to_string(),
                })?
            }
        };

        let codes: IndexMap<String, String> = match self.get("currency.codes") {
            None => STANDARD_CODES
                .iter()
                .map(|(c, s)| (c.to_string(), s.to_string()))
                .collect(),
            Some(value) => {
                serde_json::from_value(value.clone()).map_err(|e| Error::InvalidConfig {
                    key: "currency.codes".to_string(),
                    message: e.to_string(),
                })?
            }
        };

        let default_symbol = match self.get("currency.default") {
            None => DEFAULT_SYMBOL,
            Some(value) => value.as_str().ok_or_else(|| Error::InvalidConfig {
                key: "currency.default".to_string(),
                message: format!("expected a string, got {value}"),
            })?,
        };

        CurrencyTable::new(&glyphs, &codes, default_symbol)
    }

    /// Reads a marker (`[attr]` / `.class`) stored at `dotted_path`.
    pub fn marker(&self, dotted_path: &str) -> Result<Marker> {
        let raw = self
            .get_str(dotted_path)
            .ok_or_else(|| Error::InvalidConfig {
                key: dotted_path.to_string(),
                message: "expected a marker string".to_string(),
            })?;
        Marker::parse(raw)
    }
}

fn merge_into(target: &mut Value, overrides: &Value) {
    if let (Some(target_map), Some(override_map)) = (target.as_object_mut(), overrides.as_object())
    {
        for (key, value) in override_map {
            if let Some(existing) = target_map.get_mut(key) {
                merge_into(existing, value);
            } else {
                target_map.insert(key.clone(), value.clone());
            }
        }
        return;
    }
    *target = overrides.clone();
}

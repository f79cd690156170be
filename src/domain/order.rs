use crate::domain::model::{FontSizes, LabelField, Order};
use crate::utils::error::{LabelError, Result};
use crate::utils::validation::{
    parse_font_size, validate_non_empty_string, validate_required_field, Violations,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Order numbers name a directory, an archive and a temp dir prefix, so they
/// are bounded in bytes to stay under the 255-byte file name limit.
const MAX_ORDER_NUMBER_BYTES: usize = 200;

/// Fallbacks applied to blank submission fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelDefaults {
    pub made_in: String,
    pub font_size: u32,
}

impl Default for LabelDefaults {
    fn default() -> Self {
        Self {
            made_in: crate::domain::model::DEFAULT_MADE_IN.to_string(),
            font_size: crate::domain::model::DEFAULT_FONT_SIZE,
        }
    }
}

/// Raw, unvalidated submission fields as they arrive from a form or the CLI.
#[derive(Debug, Clone, Default)]
pub struct OrderForm {
    pub order_number: Option<String>,
    pub customer_name: Option<String>,
    pub customer_info: Option<String>,
    pub made_in: Option<String>,
    pub font_sizes: HashMap<LabelField, String>,
}

impl OrderForm {
    /// Builds a form from named text fields. Unknown names are ignored.
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut form = OrderForm::default();
        for (name, value) in fields {
            form.set(name.as_ref(), value.into());
        }
        form
    }

    pub fn set(&mut self, name: &str, value: String) {
        match name {
            "order_number" => self.order_number = Some(value),
            "customer_name" => self.customer_name = Some(value),
            "customer_info" => self.customer_info = Some(value),
            "made_in" => self.made_in = Some(value),
            other => {
                if let Some(field) = LabelField::ALL
                    .into_iter()
                    .find(|f| f.font_size_input() == other)
                {
                    self.font_sizes.insert(field, value);
                } else {
                    tracing::debug!("Ignoring unknown form field '{}'", other);
                }
            }
        }
    }

    /// Validates every field, recording violations into `violations` instead
    /// of stopping at the first one. Returns the order only when all fields
    /// were valid.
    pub fn validate_into(
        &self,
        defaults: &LabelDefaults,
        violations: &mut Violations,
    ) -> Option<Order> {
        let order_number = violations
            .record(validate_order_number(self.order_number.as_deref()))
            .map(str::to_string);
        let customer_name = violations
            .record(validate_required_field("customer_name", &self.customer_name))
            .cloned();
        let customer_info = violations
            .record(validate_required_field("customer_info", &self.customer_info))
            .cloned();

        let made_in = match self.made_in.as_deref() {
            Some(made_in) if !made_in.trim().is_empty() => made_in.to_string(),
            _ => defaults.made_in.clone(),
        };

        let mut font_sizes = FontSizes::uniform(defaults.font_size);
        let mut sizes_valid = true;
        for field in LabelField::ALL {
            let raw = self.font_sizes.get(&field).map(String::as_str);
            match violations.record(parse_font_size(field.font_size_input(), raw, defaults.font_size)) {
                Some(size) => font_sizes.set(field, size),
                None => sizes_valid = false,
            }
        }

        match (order_number, customer_name, customer_info) {
            (Some(order_number), Some(customer_name), Some(customer_info)) if sizes_valid => {
                Some(Order {
                    order_number,
                    customer_name,
                    customer_info,
                    made_in,
                    font_sizes,
                })
            }
            _ => None,
        }
    }

    pub fn validate(&self, defaults: &LabelDefaults) -> Result<Order> {
        let mut violations = Violations::new();
        let order = self.validate_into(defaults, &mut violations);
        violations.into_result()?;
        order.ok_or_else(|| LabelError::ProcessingError {
            message: "order validation produced no order".to_string(),
        })
    }
}

/// The order number names a directory and the archive, so it must be a
/// single safe path component.
fn validate_order_number(raw: Option<&str>) -> Result<&str> {
    let value = raw.ok_or_else(|| LabelError::MissingConfigError {
        field: "order_number".to_string(),
    })?;
    validate_non_empty_string("order_number", value)?;

    let value = value.trim();
    let reason = if value.len() > MAX_ORDER_NUMBER_BYTES {
        Some(format!(
            "Value must be at most {} bytes of UTF-8",
            MAX_ORDER_NUMBER_BYTES
        ))
    } else if value == "." || value == ".." {
        Some("Value cannot be a relative path".to_string())
    } else if value.contains(['/', '\\']) {
        Some("Value cannot contain path separators".to_string())
    } else if value.chars().any(char::is_control) {
        Some("Value cannot contain control characters".to_string())
    } else {
        None
    };

    match reason {
        Some(reason) => Err(LabelError::InvalidConfigValueError {
            field: "order_number".to_string(),
            value: value.to_string(),
            reason,
        }),
        None => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_form() -> OrderForm {
        OrderForm::from_fields([
            ("order_number", "PO-1001"),
            ("customer_name", "ACME Trading"),
            ("customer_info", "Rotterdam, NL"),
            ("made_in", ""),
        ])
    }

    #[test]
    fn test_blank_inputs_take_defaults() {
        let order = complete_form().validate(&LabelDefaults::default()).unwrap();
        assert_eq!(order.order_number, "PO-1001");
        assert_eq!(order.made_in, "MADE IN CHINA");
        assert_eq!(order.font_sizes, FontSizes::uniform(12));
    }

    #[test]
    fn test_explicit_values_are_kept() {
        let mut form = complete_form();
        form.set("made_in", "MADE IN VIETNAM".to_string());
        form.set("name_font_size", "20".to_string());
        form.set("customer_info_font_size", "9".to_string());

        let order = form.validate(&LabelDefaults::default()).unwrap();
        assert_eq!(order.made_in, "MADE IN VIETNAM");
        assert_eq!(order.font_sizes.name, 20);
        assert_eq!(order.font_sizes.customer_info, 9);
        assert_eq!(order.font_sizes.product_info, 12);
    }

    #[test]
    fn test_configured_defaults() {
        let defaults = LabelDefaults {
            made_in: "MADE IN TAIWAN".to_string(),
            font_size: 16,
        };
        let order = complete_form().validate(&defaults).unwrap();
        assert_eq!(order.made_in, "MADE IN TAIWAN");
        assert_eq!(order.font_sizes, FontSizes::uniform(16));
    }

    #[test]
    fn test_all_violations_reported_together() {
        let form = OrderForm::from_fields([
            ("order_number", "../etc"),
            ("customer_info", ""),
            ("name_font_size", "large"),
            ("made_in_font_size", "0"),
        ]);

        match form.validate(&LabelDefaults::default()) {
            Err(LabelError::ValidationError { violations }) => {
                let fields: Vec<_> = violations.iter().map(|v| v.field.as_str()).collect();
                assert_eq!(
                    fields,
                    vec!["order_number", "customer_name", "name_font_size", "made_in_font_size"]
                );
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_order_number_rules() {
        assert!(validate_order_number(None).is_err());
        assert!(validate_order_number(Some("  ")).is_err());
        assert!(validate_order_number(Some("..")).is_err());
        assert!(validate_order_number(Some("a\\b")).is_err());
        assert!(validate_order_number(Some("line\nbreak")).is_err());
        assert_eq!(validate_order_number(Some(" 2024-订单-7 ")).unwrap(), "2024-订单-7");
    }

    #[test]
    fn test_order_number_length_counts_bytes() {
        // three bytes per character
        let fits = "订".repeat(66);
        assert_eq!(validate_order_number(Some(&fits)).unwrap(), fits);

        let too_long = "订".repeat(90);
        match validate_order_number(Some(&too_long)) {
            Err(LabelError::InvalidConfigValueError { field, reason, .. }) => {
                assert_eq!(field, "order_number");
                assert!(reason.contains("200 bytes"));
            }
            other => panic!("expected length violation, got {:?}", other),
        }
        assert!(validate_order_number(Some(&"A".repeat(201))).is_err());
    }
}

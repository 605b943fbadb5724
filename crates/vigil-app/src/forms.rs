// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use serde::Serialize;

use crate::model::Category;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoginFormInput {
    pub username: String,
    pub password: String,
}

impl LoginFormInput {
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            bail!("username is required -- enter a username and retry");
        }
        if self.password.is_empty() {
            bail!("password is required -- enter a password and retry");
        }
        Ok(())
    }
}

/// Category create/edit payload. Serializes to the exact request body the
/// categories endpoint binds: `{name, description, default_criticality,
/// color}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryFormInput {
    pub name: String,
    pub description: String,
    pub default_criticality: i64,
    pub color: String,
}

impl Default for CategoryFormInput {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            default_criticality: 5,
            color: "#3498db".to_owned(),
        }
    }
}

impl CategoryFormInput {
    /// Prefill for the edit modal from an existing record.
    pub fn from_category(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            description: category.description.clone(),
            default_criticality: category.default_criticality,
            color: if category.color.is_empty() {
                "#3498db".to_owned()
            } else {
                category.color.clone()
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("category name is required -- enter a name and retry");
        }
        if !(1..=10).contains(&self.default_criticality) {
            bail!(
                "default criticality must be between 1 and 10, got {}",
                self.default_criticality
            );
        }
        if !is_hex_color(&self.color) {
            bail!("category color must be a #rrggbb value, got {:?}", self.color);
        }
        Ok(())
    }
}

fn is_hex_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    digits.len() == 6 && digits.chars().all(|ch| ch.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::{CategoryFormInput, LoginFormInput};
    use crate::ids::CategoryId;
    use crate::model::Category;

    #[test]
    fn login_validation_requires_both_fields() {
        let empty = LoginFormInput::default();
        assert!(empty.validate().is_err());

        let no_password = LoginFormInput {
            username: "ops".to_owned(),
            password: String::new(),
        };
        assert!(no_password.validate().is_err());

        let complete = LoginFormInput {
            username: "ops".to_owned(),
            password: "hunter2".to_owned(),
        };
        assert!(complete.validate().is_ok());
    }

    #[test]
    fn category_validation_rejects_empty_name() {
        let form = CategoryFormInput {
            name: "  ".to_owned(),
            ..CategoryFormInput::default()
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn category_validation_bounds_criticality() {
        for score in [0, 11, -3] {
            let form = CategoryFormInput {
                name: "Malware".to_owned(),
                default_criticality: score,
                ..CategoryFormInput::default()
            };
            assert!(form.validate().is_err(), "score {score} should be rejected");
        }

        let form = CategoryFormInput {
            name: "Malware".to_owned(),
            default_criticality: 10,
            ..CategoryFormInput::default()
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn category_validation_rejects_bad_colors() {
        for color in ["", "3498db", "#34", "#34zzdb"] {
            let form = CategoryFormInput {
                name: "Malware".to_owned(),
                color: color.to_owned(),
                ..CategoryFormInput::default()
            };
            assert!(form.validate().is_err(), "color {color:?} should be rejected");
        }
    }

    #[test]
    fn edit_prefill_copies_record_fields() {
        let category = Category {
            id: CategoryId::new("cat-1"),
            name: "Phishing".to_owned(),
            description: "Credential lures".to_owned(),
            default_criticality: 6,
            color: "#e74c3c".to_owned(),
            created_at: None,
            updated_at: None,
        };

        let form = CategoryFormInput::from_category(&category);
        assert_eq!(form.name, "Phishing");
        assert_eq!(form.default_criticality, 6);
        assert_eq!(form.color, "#e74c3c");
    }

    #[test]
    fn edit_prefill_defaults_missing_color() {
        let category = Category {
            id: CategoryId::new("cat-2"),
            name: "Leak".to_owned(),
            description: String::new(),
            default_criticality: 8,
            color: String::new(),
            created_at: None,
            updated_at: None,
        };
        assert_eq!(CategoryFormInput::from_category(&category).color, "#3498db");
    }

    #[test]
    fn category_form_serializes_request_body() {
        let form = CategoryFormInput {
            name: "Malware".to_owned(),
            description: "Families and droppers".to_owned(),
            default_criticality: 7,
            color: "#e74c3c".to_owned(),
        };
        let encoded = serde_json::to_string(&form).expect("encode form");
        assert!(encoded.contains("\"default_criticality\":7"));
        assert!(encoded.contains("\"color\":\"#e74c3c\""));
    }
}

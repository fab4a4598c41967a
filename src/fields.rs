// Schema resolver
// Maps a template's declared fields to the dynamic controls an item editor
// presents, and lazily validates item payloads against them. Validation is
// deliberately lenient: items may carry ad hoc keys the template never
// declared, and the validator reports rather than rejects.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::db::schema::Template;

/// One editable control derived from a template field
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldControl {
    pub name: String,
    pub required: bool,
}

/// The dynamic field controls for a template, in declaration order.
pub fn field_controls(template: &Template) -> Vec<FieldControl> {
    template
        .fields
        .iter()
        .map(|f| FieldControl {
            name: f.name.clone(),
            required: f.required,
        })
        .collect()
}

/// Populate defaults: every declared field missing from the payload gets an
/// empty value so editors always see the full control set.
pub fn apply_defaults(template: &Template, data: &mut Map<String, Value>) {
    for field in &template.fields {
        data.entry(field.name.clone())
            .or_insert_with(|| Value::String(String::new()));
    }
}

/// What a lazy validation pass found. Nothing here is fatal by itself;
/// callers decide whether missing required fields are an error.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub missing_required: Vec<String>,
    pub undeclared: Vec<String>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.missing_required.is_empty() && self.undeclared.is_empty()
    }
}

/// Per-template validator, bound to one template version's field set.
pub struct FieldValidator<'a> {
    template: &'a Template,
}

impl<'a> FieldValidator<'a> {
    pub fn for_template(template: &'a Template) -> Self {
        Self { template }
    }

    pub fn check(&self, data: &Map<String, Value>) -> ValidationReport {
        let mut report = ValidationReport::default();

        for field in &self.template.fields {
            if !field.required {
                continue;
            }
            let missing = match data.get(&field.name) {
                None | Some(Value::Null) => true,
                Some(Value::String(s)) => s.is_empty(),
                Some(_) => false,
            };
            if missing {
                report.missing_required.push(field.name.clone());
            }
        }

        for key in data.keys() {
            if !self.template.fields.iter().any(|f| &f.name == key) {
                report.undeclared.push(key.clone());
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema::FieldDef;

    fn template_with(fields: Vec<FieldDef>) -> Template {
        Template {
            id: 1,
            owner_id: "u1".into(),
            name: "Sneakers".into(),
            fields,
            created_at: "2024-01-01 00:00:00".into(),
        }
    }

    #[test]
    fn test_field_controls_preserve_order_and_required() {
        let template = template_with(vec![
            FieldDef { name: "Brand".into(), required: true, kind: None },
            FieldDef { name: "Size".into(), required: false, kind: None },
        ]);
        let controls = field_controls(&template);
        assert_eq!(
            controls,
            vec![
                FieldControl { name: "Brand".into(), required: true },
                FieldControl { name: "Size".into(), required: false },
            ]
        );
    }

    #[test]
    fn test_apply_defaults_fills_missing_only() {
        let template = template_with(vec![
            FieldDef { name: "Brand".into(), required: true, kind: None },
            FieldDef { name: "Size".into(), required: false, kind: None },
        ]);
        let mut data = Map::new();
        data.insert("Brand".into(), Value::String("Nike".into()));

        apply_defaults(&template, &mut data);
        assert_eq!(data.get("Brand"), Some(&Value::String("Nike".into())));
        assert_eq!(data.get("Size"), Some(&Value::String(String::new())));
    }

    #[test]
    fn test_validator_reports_but_tolerates_undeclared_keys() {
        let template = template_with(vec![FieldDef {
            name: "Brand".into(),
            required: true,
            kind: None,
        }]);
        let mut data = Map::new();
        data.insert("Condition".into(), Value::String("mint".into()));

        let report = FieldValidator::for_template(&template).check(&data);
        assert_eq!(report.missing_required, vec!["Brand".to_string()]);
        assert_eq!(report.undeclared, vec!["Condition".to_string()]);
        assert!(!report.is_clean());

        data.insert("Brand".into(), Value::String("Adidas".into()));
        let report = FieldValidator::for_template(&template).check(&data);
        assert!(report.missing_required.is_empty());
        // Undeclared keys are reported, never fatal
        assert_eq!(report.undeclared, vec!["Condition".to_string()]);
    }
}

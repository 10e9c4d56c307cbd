use formtree::view::BoxError;
use formtree::{ConfigError, FieldFactory, Fillable, Form, FormValues, Node, Value, View};
use pretty_assertions::assert_eq;
use serde_json::{Value as Json, json};
use std::sync::Arc;

const ORDER_FORM: &str = r#"
action: /orders
method: POST
attributes:
  class: order
fields:
  - type: text
    name: customer
    label: Customer
    validators:
      - rule: required
        message: Customer is required
  - type: email
    name: email
    validators:
      - rule: email
        message: Email is invalid
  - type: select
    name: shipping
    variants:
      standard: Standard
      express: Express
  - type: html
    value: "<hr>"
  - type: group
    name: items
    title: Items
    is_multi: true
    fields:
      - type: text
        name: sku
        validators:
          - rule: pattern
            pattern: "^[A-Z]{3}-\\d+$"
            message: Bad SKU
      - type: number
        name: qty
        default: 1
        validators:
          - rule: required
            message: Quantity is required
"#;

fn order_form() -> Form {
    Form::from_yaml_str(Arc::new(FieldFactory::new()), ORDER_FORM).unwrap()
}

fn submission() -> FormValues {
    FormValues::from_pairs([
        ("customer", json!("Ada")),
        ("email", json!("not-an-email")),
        ("shipping", json!("express")),
        ("items[0][sku]", json!("ABC-1")),
        ("items[0][qty]", json!(2)),
        ("items[1][sku]", json!("oops")),
        ("items[1][qty]", json!("")),
    ])
}

#[test]
fn definition_builds_expected_tree() {
    let form = order_form();
    let tags: Vec<&str> = form.fields().iter().map(Node::type_tag).collect();
    assert_eq!(tags, vec!["input", "input", "select", "html", "group"]);

    let items = form.fields()[4].as_group().unwrap();
    assert!(items.is_multi());
    let first: Vec<String> = items.fields_array().iter().map(|f| f.full_name()).collect();
    assert_eq!(first, vec!["items[0][sku]", "items[0][qty]"]);
}

#[test]
fn bind_validate_and_report_by_dot_path() {
    let mut form = order_form();
    let values = submission();
    form.set_value(&values).unwrap();

    assert_eq!(form.field("customer").unwrap().value(), &Value::from("Ada"));
    assert_eq!(form.field("items[0][qty]").unwrap().value(), &Value::from("2"));
    assert_eq!(form.field("items.1.sku").unwrap().value(), &Value::from("oops"));

    let mut validator = form.validator(values);
    assert!(!validator.validate());
    let errors = validator.into_errors();
    assert_eq!(
        errors.into_iter().collect::<Vec<_>>(),
        vec![
            ("email".to_string(), "Email is invalid".to_string()),
            ("items.1.sku".to_string(), "Bad SKU".to_string()),
            ("items.1.qty".to_string(), "Quantity is required".to_string()),
        ]
    );
    assert_eq!(
        form.field("items.1.qty").unwrap().error(),
        Some("Quantity is required")
    );
}

#[test]
fn corrected_submission_passes() {
    let mut form = order_form();
    let values = FormValues::from_json(json!({
        "customer": "Ada",
        "email": "ada@example.com",
        "items": [{"sku": "ABC-1", "qty": 2}],
    }));
    form.set_value(&values).unwrap();
    assert!(form.validator(values).validate());
}

#[test]
fn snapshot_carries_state_for_rendering() {
    let mut form = order_form();
    form.set_value(&submission()).unwrap();
    form.validator(submission()).validate();

    let snapshot = form.serialize();
    assert_eq!(snapshot["method"], json!("post"));
    assert_eq!(snapshot["attributes"], json!({"class": "order"}));

    let shipping = &snapshot["fields"][2];
    assert_eq!(shipping["template"], json!("fields/select"));
    assert_eq!(
        shipping["variants"],
        json!([
            {"label": "Standard", "value": "standard", "selected": false},
            {"label": "Express", "value": "express", "selected": true},
        ])
    );

    let items = &snapshot["fields"][4];
    assert_eq!(items["is_multi"], json!(true));
    let second = &items["sub_groups"]["1"]["fields"];
    assert_eq!(second[0]["full_name"], json!("items[1][sku]"));
    assert_eq!(second[0]["error"], json!("Bad SKU"));
    assert_eq!(second[1]["default"], json!("1"));
}

#[test]
fn rendering_goes_through_the_view() {
    let view = View::new(|template: &str, context: &Json| -> Result<String, BoxError> {
        Ok(format!("{template}:{}", context["form"]["action"]))
    });
    let form = order_form();
    assert_eq!(form.render(&view, None).unwrap(), "ui_form::form/form:\"/orders\"");

    let html = &form.fields()[3];
    assert_eq!(html.render(&view, None).unwrap(), "<hr>");
}

#[test]
fn second_submission_starts_clean() {
    let mut first = order_form();
    first.set_value(&submission()).unwrap();
    first.validator(submission()).validate();

    let second = first.fresh_clone();
    assert_eq!(second.field("customer").unwrap().value(), &Value::None);
    assert_eq!(second.field("email").unwrap().error(), None);
    assert_eq!(first.field("email").unwrap().error(), Some("Email is invalid"));
}

#[test]
fn unknown_types_surface_as_config_errors() {
    let err = Form::from_yaml_str(
        Arc::new(FieldFactory::new()),
        "fields:\n  - type: group\n    name: g\n    fields:\n      - type: slider\n",
    )
    .unwrap_err();
    match err {
        ConfigError::Construction { type_tag, source } => {
            assert_eq!(type_tag, "group");
            assert!(matches!(*source, ConfigError::UnknownType(ref tag) if tag == "slider"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

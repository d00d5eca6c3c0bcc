#![allow(non_snake_case)]

use chrono::{DateTime, FixedOffset, NaiveDate};
use formwork::{FieldKind, FormSchema, FormValue, Nullable, ScalarKind, Slot};
use rust_decimal::Decimal;

#[derive(FormSchema, Default, Debug, PartialEq)]
struct Address {
    Street: String,
    Zip: Nullable<u32>,
}

#[derive(FormSchema, Default, Debug, PartialEq)]
struct Customer {
    Name: String,
    Active: bool,
    Home: Address,
    Previous: Vec<Address>,
    Nicknames: Vec<String>,
}

#[test]
fn unit_struct() {
    formwork_testhelpers::setup();

    #[derive(FormSchema, Default)]
    struct Nothing;

    assert_eq!(Nothing::SCHEMA.type_name, "Nothing");
    assert!(Nothing::SCHEMA.fields.is_empty());
    assert_eq!(Nothing::SCHEMA.to_string(), "Nothing {}");
    assert!(Nothing.field_slot(0).is_none());
}

#[test]
fn field_order_and_kinds() {
    formwork_testhelpers::setup();

    let schema = Customer::SCHEMA;
    let names: Vec<_> = schema.fields.iter().map(|f| f.name).collect();
    assert_eq!(names, ["Name", "Active", "Home", "Previous", "Nicknames"]);

    assert!(matches!(schema.fields[0].kind, FieldKind::Scalar(ScalarKind::Text)));
    assert!(matches!(schema.fields[1].kind, FieldKind::Scalar(ScalarKind::Bool)));
    assert_eq!(schema.fields[2].kind.schema().unwrap().type_name, "Address");
    assert_eq!(schema.fields[3].kind.to_string(), "collection<Address>");
    assert_eq!(
        schema.to_string(),
        "Customer { Name: text, Active: bool, Home: Address, Previous: collection<Address>, Nicknames: collection<text> }"
    );
}

#[test]
fn derived_structs_nest() {
    formwork_testhelpers::setup();

    assert!(matches!(Address::KIND, FieldKind::Composite(_)));
    let nested = Address::KIND.schema().unwrap();
    assert_eq!(nested.to_string(), "Address { Street: text, Zip: nullable<u32> }");
}

#[test]
fn recursive_structs() {
    formwork_testhelpers::setup();

    #[derive(FormSchema, Default)]
    struct Category {
        Title: String,
        Children: Vec<Category>,
    }

    let children = Category::SCHEMA.field("Children").unwrap();
    let element = children.kind.element().unwrap();
    assert_eq!(element.schema().unwrap().type_name, "Category");
    assert_eq!(format!("{:?}", children.kind), r#"Collection(Composite("Category"))"#);
}

#[test]
fn rename_and_skip() {
    formwork_testhelpers::setup();

    #[derive(FormSchema, Default)]
    #[form(rename_all = "camelCase")]
    struct Settings {
        page_size: u16,
        #[form(rename = "Theme")]
        theme_name: String,
        #[form(skip)]
        loaded_from: String,
        r#type: Option<i8>,
    }

    let names: Vec<_> = Settings::SCHEMA.fields.iter().map(|f| f.name).collect();
    assert_eq!(names, ["pageSize", "Theme", "type"]);
    assert_eq!(Settings::SCHEMA.field_index("type"), Some(2));

    let mut settings = Settings {
        loaded_from: "disk".to_owned(),
        ..Settings::default()
    };
    let Some(Slot::Nullable(kind)) = settings.field_slot(2) else {
        panic!("`type` should be nullable");
    };
    kind.fill("-3").unwrap();
    assert_eq!(settings.r#type, Some(-3));
    assert_eq!(settings.loaded_from, "disk");
}

#[test]
fn optional_types() {
    formwork_testhelpers::setup();

    #[derive(FormSchema, Default)]
    struct Order {
        Placed: DateTime<FixedOffset>,
        Ships: Option<NaiveDate>,
        Total: Decimal,
        Discount: Nullable<Decimal>,
    }

    assert_eq!(
        Order::SCHEMA.to_string(),
        "Order { Placed: timestamp, Ships: nullable<timestamp>, Total: decimal, Discount: nullable<decimal> }"
    );
}

#[test]
fn accessor_writes_into_fields() {
    formwork_testhelpers::setup();

    let mut customer = Customer::default();

    for (index, field) in Customer::SCHEMA.fields.iter().enumerate() {
        let slot = customer.field_slot(index).unwrap();
        assert!(field.kind.accepts(&slot), "{}", field.name);
    }

    let Some(Slot::Composite(home)) = customer.field_slot(2) else {
        panic!("Home should be composite");
    };
    let Some(Slot::Scalar(street)) = home.slot_at(0) else {
        panic!("Street should be scalar");
    };
    street.coerce("Main St").unwrap();

    let Some(Slot::Collection(previous)) = customer.field_slot(3) else {
        panic!("Previous should be a collection");
    };
    previous.reset(1);
    let Some(Slot::Composite(first)) = previous.element(0) else {
        panic!("element should be composite");
    };
    let Some(Slot::Nullable(zip)) = first.slot_at(1) else {
        panic!("Zip should be nullable");
    };
    zip.fill("12345").unwrap();

    assert_eq!(
        customer,
        Customer {
            Home: Address {
                Street: "Main St".to_owned(),
                Zip: Nullable::null(),
            },
            Previous: vec![Address {
                Street: String::new(),
                Zip: Nullable::new(12345),
            }],
            ..Customer::default()
        }
    );
}

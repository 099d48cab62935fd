use webcore::json::validate::{IntegerPredicate, ObjectValidator, StringValidator};
use webcore::prelude::*;
use webcore::vfs::FileErrorKind;

fn config_storage() -> Storage {
    let storage = Storage::new("config", MemoryBackend::new());
    storage
        .root()
        .unwrap()
        .create(
            "services/api.json",
            r#"{"name":"api","port":8080,"tags":["public","v2"]}"#,
        )
        .unwrap();
    storage
}

#[test]
fn stored_json_converts_to_properties() {
    let storage = config_storage();
    let file = storage.file("services/api.json").unwrap();
    let binder = MultiBinder::default();

    let doc = binder.decode(&file.read_bytes().unwrap(), &Format::JSON).unwrap();
    let props = binder.encode(&doc, &Format::PROPERTIES).unwrap();

    let copy = storage
        .root()
        .unwrap()
        .create("services/api.properties", props.clone())
        .unwrap();
    assert_eq!(
        copy.read_string().unwrap(),
        "name=api\nport=8080\ntags[0]=public\ntags[1]=v2\n"
    );
}

#[test]
fn validation_errors_point_into_the_document() {
    let storage = config_storage();
    let text = storage
        .file("services/api.json")
        .unwrap()
        .read_string()
        .unwrap();
    let mut doc = JsonValue::parse(&text).unwrap();
    jpath!("$.port").set(&mut doc, JsonValue::from(-1)).unwrap();

    let schema = ObjectValidator::new()
        .required("name", StringValidator::new().min_len(1))
        .required("port", IntegerPredicate::range(1, 65535))
        .allow_unknown(true);

    let errors = check(&schema, &doc).unwrap_err();
    assert_eq!(errors.len(), 1);

    let location = errors[0].location.to_string();
    let offending = doc.select(&location).unwrap();
    assert_eq!(offending, vec![&JsonValue::from(-1)]);
}

#[test]
fn guarded_items_report_one_error_type() {
    let storage = config_storage();
    let api = Guarded::new(storage.file("services/api.json").unwrap());
    storage.close();

    let err: StorageError = api.call(|f| f.read_string()).unwrap_err();
    assert_eq!(err.kind(), FileErrorKind::Closed);
}

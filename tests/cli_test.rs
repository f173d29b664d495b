use assert_cmd::Command;
use indoc::indoc;
use predicates::prelude::*;
use std::io::Write as _;
use tempfile::TempDir;

const ORDER_MODEL: &str = indoc! {r#"
    [[classes]]
    name = "Order"
    supporting_methods = ["title"]

    [[classes.members]]
    name = "ref"
    kind = "property"
    type = "String"

    [[classes.members]]
    name = "cost"
    kind = "property"
    type = "BigDecimal"
"#};

fn write_model(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

#[test]
fn validate_clean_model_succeeds_with_json_summary() {
    let dir = TempDir::new().unwrap();
    let model = write_model(&dir, "model.toml", ORDER_MODEL);
    let output = dir.path().join("report.json");

    let mut cmd = Command::cargo_bin("facetmap").unwrap();
    cmd.arg("validate")
        .arg(&model)
        .arg("--format")
        .arg("json")
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let content = std::fs::read_to_string(&output).unwrap();
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(json["classes"], 1);
    assert_eq!(json["members"], 2);
    assert_eq!(json["report"]["failures"], serde_json::json!([]));
}

#[test]
fn validate_strict_fails_on_model_errors() {
    let dir = TempDir::new().unwrap();
    let model = write_model(
        &dir,
        "model.toml",
        indoc! {r#"
            [[classes]]
            name = "Bad"

            [[classes.annotations]]
            name = "projection"
            values = { value = "missing" }
        "#},
    );

    let mut cmd = Command::cargo_bin("facetmap").unwrap();
    cmd.arg("validate")
        .arg(&model)
        .arg("--strict")
        .assert()
        .failure()
        .stderr(predicate::str::contains("validation failed"));
}

#[test]
fn validate_without_strict_tolerates_warnings() {
    let dir = TempDir::new().unwrap();
    let model = write_model(
        &dir,
        "model.toml",
        indoc! {r#"
            [[classes]]
            name = "Order"
            supporting_methods = ["validateReff"]

            [[classes.members]]
            name = "ref"
            kind = "property"
            type = "String"
        "#},
    );

    let mut cmd = Command::cargo_bin("facetmap").unwrap();
    cmd.arg("validate").arg(&model).assert().success();
}

#[test]
fn validate_rejects_unknown_superclass() {
    let dir = TempDir::new().unwrap();
    let model = write_model(
        &dir,
        "model.toml",
        indoc! {r#"
            [[classes]]
            name = "Person"
            superclass = "Party"
        "#},
    );

    let mut cmd = Command::cargo_bin("facetmap").unwrap();
    cmd.arg("validate")
        .arg(&model)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Party"));
}

#[test]
fn inspect_dumps_members_and_facets() {
    let dir = TempDir::new().unwrap();
    let model = write_model(&dir, "model.toml", ORDER_MODEL);

    let mut cmd = Command::cargo_bin("facetmap").unwrap();
    cmd.arg("inspect")
        .arg(&model)
        .arg("Order")
        .assert()
        .success()
        .stdout(predicate::str::contains("class Order"))
        .stdout(predicate::str::contains("ref"))
        .stdout(predicate::str::contains("title"));
}

#[test]
fn inspect_unknown_class_fails() {
    let dir = TempDir::new().unwrap();
    let model = write_model(&dir, "model.toml", ORDER_MODEL);

    let mut cmd = Command::cargo_bin("facetmap").unwrap();
    cmd.arg("inspect").arg(&model).arg("Missing").assert().failure();
}

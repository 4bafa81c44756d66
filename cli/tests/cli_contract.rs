//! Integration tests for the flatpdf CLI: argument contract and
//! end-to-end conversion.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

use lopdf::{dictionary, Object, Stream};

fn cmd() -> Command {
    Command::cargo_bin("flatpdf").unwrap()
}

/// Two Letter pages, "Hello" on the first and nothing on the second, with an
/// outline whose first root targets page 1 and whose second root is a
/// dangling reference.
fn sample_pdf() -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let media_box = vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(612),
        Object::Integer(792),
    ];

    let mut page_ids = Vec::new();
    for content_str in ["BT /F1 12 Tf 72 720 Td (Hello) Tj ET", ""] {
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content_str.as_bytes().to_vec(),
        ));
        let resources = dictionary! {
            "Font" => dictionary! { "F1" => Object::Reference(font_id) },
        };
        page_ids.push(doc.add_object(dictionary! {
            "Type" => "Page",
            "MediaBox" => media_box.clone(),
            "Contents" => Object::Reference(content_id),
            "Resources" => resources,
        }));
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| Object::Reference(*id)).collect();
    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => Object::Integer(2),
    });
    for &pid in &page_ids {
        if let Ok(dict) = doc.get_object_mut(pid).and_then(Object::as_dict_mut) {
            dict.set("Parent", Object::Reference(pages_id));
        }
    }

    let ch1 = doc.add_object(dictionary! {
        "Title" => Object::string_literal("Chapter 1"),
        "Dest" => vec![Object::Reference(page_ids[0]), Object::Name(b"Fit".to_vec())],
        // Unreadable second root
        "Next" => Object::Reference((9999, 0)),
    });
    let outlines_id = doc.add_object(dictionary! {
        "Type" => "Outlines",
        "First" => Object::Reference(ch1),
    });

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
        "Outlines" => Object::Reference(outlines_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

#[test]
fn no_arguments_prints_usage_and_exits_1() {
    cmd()
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Usage: flatpdf"));
}

#[test]
fn one_argument_prints_usage_and_exits_1() {
    cmd()
        .arg("input.pdf")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Usage: flatpdf"));
}

#[test]
fn three_arguments_print_usage_and_touch_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.json");

    cmd()
        .args(["a.pdf", out.to_str().unwrap(), "extra"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Usage: flatpdf"));

    assert!(!out.exists());
}

#[test]
fn converts_document_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("sample.pdf");
    let output = dir.path().join("sample.json");
    std::fs::write(&input, sample_pdf()).unwrap();

    cmd()
        .args([input.to_str().unwrap(), output.to_str().unwrap()])
        .assert()
        .success();

    let json = std::fs::read_to_string(&output).unwrap();

    // Pretty-printed with 4-space indentation, pages before outline
    assert!(json.contains("\n    \"pages\""));
    assert!(json.find("\"pages\"").unwrap() < json.find("\"outline\"").unwrap());

    let model: serde_json::Value = serde_json::from_str(&json).unwrap();

    let pages = model["pages"].as_array().unwrap();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0]["width"], 612.0);
    assert_eq!(pages[0]["height"], 792.0);
    let blocks = pages[0]["blocks"].as_array().unwrap();
    assert_eq!(blocks.len(), 1);
    assert!(blocks[0]["text"].as_str().unwrap().contains("Hello"));
    assert!(pages[1]["blocks"].as_array().unwrap().is_empty());

    // The dangling second root truncates the level: one node survives.
    let outline = model["outline"].as_array().unwrap();
    assert_eq!(outline.len(), 1);
    assert_eq!(outline[0]["title"], "Chapter 1");
    assert_eq!(outline[0]["page"], 0);
    assert!(outline[0]["outline"].as_array().unwrap().is_empty());
}

#[test]
fn output_is_overwritten_wholesale() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("sample.pdf");
    let output = dir.path().join("sample.json");
    std::fs::write(&input, sample_pdf()).unwrap();
    std::fs::write(&output, "stale content that must disappear").unwrap();

    cmd()
        .args([input.to_str().unwrap(), output.to_str().unwrap()])
        .assert()
        .success();

    let json = std::fs::read_to_string(&output).unwrap();
    assert!(!json.contains("stale content"));
    assert!(json.contains("\"pages\""));
}

#[test]
fn unreadable_input_is_fatal_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("garbage.pdf");
    let output = dir.path().join("out.json");

    let mut f = std::fs::File::create(&input).unwrap();
    f.write_all(b"this is not a pdf").unwrap();

    cmd()
        .args([input.to_str().unwrap(), output.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));

    assert!(!output.exists());
}

#[test]
fn missing_input_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.json");

    cmd()
        .args(["definitely-not-here.pdf", output.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));

    assert!(!output.exists());
}

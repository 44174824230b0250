mod common;

use common::fixtures::{self, label_with_overlays};
use common::pdf_assertions::{embedded_font_program, font_names};
use common::{GeneratedPdf, TestResult, exporter, exporter_with_test_font, render, render_ai};
use labelpress::{
    BatchExportRequest, ExportRequest, ExportWarning, ExporterBuilder, FontCatalog, FontEmbedding, OutputFormat,
};
use labelpress_testing::{FontFile, font};
use serde_json::json;
use std::fs;

fn test_font_overlay(content: &str) -> serde_json::Value {
    json!({
        "x": 5, "y": 5, "w": 60, "h": 20,
        "content": content,
        "fontFamily": font::FAMILY,
        "fontSize": 10
    })
}

#[test]
fn test_export_is_deterministic() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();
    let first = render_ai(&fixtures::simple_label());
    let second = render_ai(&fixtures::simple_label());
    assert_eq!(first.bytes, second.bytes);
    Ok(())
}

#[test]
fn test_missing_font_falls_back_to_standard_font() -> TestResult {
    let pdf = render_ai(&fixtures::simple_label());
    assert_eq!(font_names(&pdf.doc), vec!["Helvetica"]);
    assert!(matches!(
        pdf.warnings.as_slice(),
        [ExportWarning::MissingFontFile { family, fallback, .. }] if family == "Arial" && fallback == "Helvetica"
    ));
    Ok(())
}

#[test]
fn test_outlined_export_without_font_keeps_text_editable() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut label = label_with_overlays(80.0, 30.0, vec![fixtures::text_overlay("Fallback", 0.0, 0.0, 80.0, 30.0)]);
    label["overlays"][0]["id"] = json!("t1");
    label["overlays"][0]["fontFamily"] = json!("No Such Family");
    label["outlined"] = json!(true);

    let pdf = render(&exporter(OutputFormat::Ai), &label)?;
    assert_eq!(pdf.page_count(), 1);
    assert!(pdf.operators(1).contains(&"Tj".to_string()));
    assert!(pdf.warnings.iter().any(|w| matches!(w, ExportWarning::MissingFontFile { .. })));
    assert!(pdf.warnings.iter().any(|w| matches!(
        w,
        ExportWarning::GlyphOutlineFailure { component: Some(id), .. } if id.to_string() == "t1"
    )));
    Ok(())
}

#[test]
fn test_outlined_export_fills_glyph_paths() -> TestResult {
    let file = FontFile::write()?;
    let mut label = label_with_overlays(80.0, 30.0, vec![test_font_overlay("AoB")]);
    label["outlined"] = json!(true);

    let pdf = render(&exporter_with_test_font(&file, font::FAMILY), &label)?;
    let operators = pdf.operators(1);
    assert!(!operators.contains(&"BT".to_string()));
    assert!(operators.contains(&"f*".to_string()));
    assert!(operators.contains(&"c".to_string()), "quadratic outlines are drawn as cubics");
    assert!(font_names(&pdf.doc).is_empty());
    assert!(pdf.warnings.is_empty());
    Ok(())
}

#[test]
fn test_editable_text_embeds_the_full_font() -> TestResult {
    let file = FontFile::write()?;
    let pdf = render(&exporter_with_test_font(&file, font::FAMILY), &label_with_overlays(80.0, 30.0, vec![test_font_overlay("AB")]))?;

    assert_eq!(font_names(&pdf.doc), vec![font::POSTSCRIPT_NAME.to_string()]);
    let program = embedded_font_program(&pdf.doc, font::POSTSCRIPT_NAME).expect("embedded font program");
    assert_eq!(program, labelpress_testing::test_font_bytes());
    assert!(pdf.warnings.is_empty());
    Ok(())
}

#[test]
fn test_subset_embedding_tags_the_font_name() -> TestResult {
    let file = FontFile::write()?;
    let exporter = ExporterBuilder::new()
        .with_font_catalog(FontCatalog::new().with_entry("1", font::FAMILY, file.path.clone()))
        .with_embedding(FontEmbedding::Subset)
        .build()?;
    let pdf = render(&exporter, &label_with_overlays(80.0, 30.0, vec![test_font_overlay("A")]))?;

    let names = font_names(&pdf.doc);
    assert_eq!(names.len(), 1);
    let (tag, name) = names[0].split_once('+').expect("subset tag");
    assert_eq!(tag.len(), 6);
    assert!(tag.chars().all(|c| c.is_ascii_uppercase()));
    assert_eq!(name, font::POSTSCRIPT_NAME);
    Ok(())
}

#[test]
fn test_fonts_are_resolved_by_catalog_id() -> TestResult {
    let file = FontFile::write()?;
    let mut overlay = test_font_overlay("AB");
    overlay["fontFamily"] = json!("Renamed In Editor");
    overlay["fontId"] = json!(1);

    let pdf = render(&exporter_with_test_font(&file, font::FAMILY), &label_with_overlays(80.0, 30.0, vec![overlay]))?;
    assert_eq!(font_names(&pdf.doc), vec![font::POSTSCRIPT_NAME.to_string()]);
    Ok(())
}

#[test]
fn test_batch_export_writes_one_page_per_label() -> TestResult {
    let dir = tempfile::tempdir()?;
    let exporter = ExporterBuilder::new().with_output_dir(dir.path()).build()?;
    let mut small = label_with_overlays(40.0, 20.0, vec![fixtures::text_overlay("2", 0.0, 0.0, 40.0, 20.0)]);
    small["variables"] = json!({});
    let batch = BatchExportRequest::from_json(&json!({ "pages": [fixtures::simple_label(), small] }).to_string())?;

    let target = dir.path().join("batch.ai");
    let outcome = exporter.export_pages_to_path(&batch, &target)?;
    assert_eq!(outcome.page_count, 2);
    assert_eq!(outcome.path, target);

    let pdf = GeneratedPdf::from_bytes(fs::read(&target)?)?;
    assert_eq!(pdf.page_count(), 2);
    Ok(())
}

#[test]
fn test_export_writes_unique_files_in_output_dir() -> TestResult {
    let dir = tempfile::tempdir()?;
    let exporter = ExporterBuilder::new().with_output_dir(dir.path()).build()?;
    let request: ExportRequest = serde_json::from_value(fixtures::simple_label())?;

    let first = exporter.export(&request)?;
    let second = exporter.export(&request)?;
    assert_ne!(first.path, second.path);
    for outcome in [&first, &second] {
        assert_eq!(outcome.path.extension().and_then(|e| e.to_str()), Some("ai"));
        assert!(fs::read(&outcome.path)?.starts_with(b"%PDF-1.7"));
    }
    assert_eq!(fs::read_dir(dir.path())?.count(), 2);
    Ok(())
}

#[test]
fn test_failed_export_keeps_previous_file() -> TestResult {
    let dir = tempfile::tempdir()?;
    let target = dir.path().join("label.pdf");
    fs::write(&target, b"previous")?;

    let exporter = ExporterBuilder::new().with_output_dir(dir.path()).with_format(OutputFormat::Pdf).build()?;
    let mut bad = fixtures::simple_label();
    bad["label"] = json!({"width": 0, "height": 50});
    let request: ExportRequest = serde_json::from_value(bad)?;

    assert!(exporter.export_to_path(&request, &target).is_err());
    assert_eq!(fs::read(&target)?, b"previous");
    assert_eq!(fs::read_dir(dir.path())?.count(), 1);
    Ok(())
}

#[test]
fn test_request_files_carry_variables() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("order.json");
    let mut label = label_with_overlays(
        60.0,
        20.0,
        vec![json!({"x": 0, "y": 0, "w": 60, "h": 20, "content": "{name}", "isVariable": true})],
    );
    label["variables"] = json!({"0": "Grace"});
    fs::write(&path, label.to_string())?;

    let request = ExportRequest::from_path(&path)?;
    let pdf = GeneratedPdf::from_bytes(exporter(OutputFormat::Pdf).render_to_vec(&request)?.bytes)?;
    let ops = pdf.operations(1);
    let shown: Vec<&[u8]> = ops.iter().filter(|op| op.operator == "Tj").filter_map(|op| op.operands[0].as_str().ok()).collect();
    assert_eq!(shown, vec![b"Grace".as_slice()]);
    Ok(())
}

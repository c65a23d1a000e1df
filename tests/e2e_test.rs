// End-to-end: job files through the compiled binary
//
// Inputs are generated on the fly: rasters with the image crate, PDFs with an
// image_to_pdf job. Nothing is committed as a fixture.

use std::path::Path;
use std::process::{Command, Output};

use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb, Rgba};
use pdf_image_convert::pdf::reader::PdfReader;
use pdf_image_convert::raster::codec;
use pdf_image_convert::render::pdfium;

// ============================================================
// Guards and helpers
// ============================================================

fn pdfium_available() -> bool {
    pdfium::is_available()
}

fn cargo_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_pdf_image_convert"))
}

fn write_png(path: &Path, width: u32, height: u32) {
    let buf = ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([(x % 200) as u8, (y % 200) as u8, ((x * y) % 256) as u8])
    });
    DynamicImage::ImageRgb8(buf)
        .save_with_format(path, ImageFormat::Png)
        .expect("write PNG fixture");
}

fn write_transparent_png(path: &Path, width: u32, height: u32) {
    let buf = ImageBuffer::from_pixel(width, height, Rgba([0u8, 0, 0, 0]));
    DynamicImage::ImageRgba8(buf)
        .save_with_format(path, ImageFormat::Png)
        .expect("write PNG fixture");
}

fn run_jobs(job_path: &Path) -> Output {
    cargo_bin()
        .arg(job_path)
        .output()
        .expect("failed to execute binary")
}

fn assert_success(output: &Output) {
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "binary failed: {stderr}");
    assert!(stderr.contains("OK:"), "stderr should report OK, got: {stderr}");
}

// ============================================================
// 1. Image jobs
// ============================================================

#[test]
fn test_e2e_compress_and_resize() {
    let dir = tempfile::tempdir().expect("create temp dir");
    write_png(&dir.path().join("photo.png"), 1000, 500);

    let job_path = dir.path().join("jobs.yaml");
    std::fs::write(
        &job_path,
        r#"
jobs:
  - kind: compress_image
    input: photo.png
    output: out/photo_small.jpg
    quality: 40
  - kind: resize_image
    input: photo.png
    output: out/photo_400.png
    output_format: png
    resize:
      width: 400
      height: 100
"#,
    )
    .expect("write job file");

    let output = run_jobs(&job_path);
    assert_success(&output);

    let jpeg = std::fs::read(dir.path().join("out/photo_small.jpg")).expect("jpeg written");
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);

    let png = std::fs::read(dir.path().join("out/photo_400.png")).expect("png written");
    let resized = codec::decode(&png).expect("decode resized");
    assert_eq!(resized.dimensions(), (400, 200));
}

#[test]
fn test_e2e_image_to_pdf_with_settings() {
    let dir = tempfile::tempdir().expect("create temp dir");
    write_png(&dir.path().join("a.png"), 4000, 2000);
    write_transparent_png(&dir.path().join("b.png"), 300, 300);
    std::fs::write(
        dir.path().join("settings.yaml"),
        "page_size: a4\nreport: report.json\n",
    )
    .expect("write settings");

    let job_path = dir.path().join("jobs.yaml");
    std::fs::write(
        &job_path,
        r#"
jobs:
  - kind: image_to_pdf
    input: [a.png, b.png]
    output: album.pdf
"#,
    )
    .expect("write job file");

    let output = run_jobs(&job_path);
    assert_success(&output);

    let pdf = std::fs::read(dir.path().join("album.pdf")).expect("pdf written");
    let reader = PdfReader::from_bytes(&pdf).expect("valid PDF");
    let rects = reader.page_rects().expect("page rects");
    assert_eq!(rects.len(), 2);
    assert_eq!((rects[0].width, rects[0].height), (2480.0, 1240.0));
    assert_eq!((rects[1].width, rects[1].height), (300.0, 300.0));

    let report = std::fs::read_to_string(dir.path().join("report.json")).expect("report written");
    let summaries: serde_json::Value = serde_json::from_str(&report).expect("report is JSON");
    assert_eq!(summaries[0]["kind"], "image_to_pdf");
    assert_eq!(summaries[0]["page_count"], 2);
}

#[test]
fn test_e2e_failed_job_does_not_stop_batch() {
    let dir = tempfile::tempdir().expect("create temp dir");
    write_png(&dir.path().join("ok.png"), 64, 64);
    std::fs::write(dir.path().join("broken.png"), b"not an image").expect("write broken");

    let job_path = dir.path().join("jobs.yaml");
    std::fs::write(
        &job_path,
        r#"
jobs:
  - kind: compress_image
    input: broken.png
    output: broken.jpg
  - kind: compress_image
    input: ok.png
    output: ok.jpg
"#,
    )
    .expect("write job file");

    let output = run_jobs(&job_path);
    assert!(!output.status.success(), "a failed job should fail the run");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR:"), "got: {stderr}");
    assert!(stderr.contains("OK:"), "got: {stderr}");
    assert!(!dir.path().join("broken.jpg").exists());
    assert!(dir.path().join("ok.jpg").exists());
}

// ============================================================
// 2. PDF jobs (need pdfium)
// ============================================================

#[test]
fn test_e2e_pdf_to_images_and_compress_pdf() {
    if !pdfium_available() {
        eprintln!("Skipping: pdfium library not available");
        return;
    }

    let dir = tempfile::tempdir().expect("create temp dir");
    write_png(&dir.path().join("p1.png"), 144, 144);
    write_png(&dir.path().join("p2.png"), 144, 72);

    let job_path = dir.path().join("jobs.yaml");
    std::fs::write(
        &job_path,
        r#"
jobs:
  - kind: image_to_pdf
    input: [p1.png, p2.png]
    output: doc.pdf
"#,
    )
    .expect("write job file");
    assert_success(&run_jobs(&job_path));

    std::fs::write(
        &job_path,
        r#"
jobs:
  - kind: pdf_to_images
    input: doc.pdf
    output: pages
    dpi: 144
    output_format: png
  - kind: compress_pdf
    input: doc.pdf
    output: doc_small.pdf
    compression_level: low
"#,
    )
    .expect("rewrite job file");
    assert_success(&run_jobs(&job_path));

    let page1 = std::fs::read(dir.path().join("pages/page_1.png")).expect("page 1");
    let page2 = std::fs::read(dir.path().join("pages/page_2.png")).expect("page 2");
    assert_eq!(codec::decode(&page1).expect("decode").dimensions(), (288, 288));
    assert_eq!(codec::decode(&page2).expect("decode").dimensions(), (288, 144));

    let small = std::fs::read(dir.path().join("doc_small.pdf")).expect("compressed pdf");
    let reader = PdfReader::from_bytes(&small).expect("valid PDF");
    assert_eq!(reader.page_count(), 2);
}


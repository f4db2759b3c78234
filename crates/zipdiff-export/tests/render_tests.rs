//! Rendering reports of real comparisons

use std::io::Cursor;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use zipdiff_core::DosDateTime;
use zipdiff_export::{
    renderer_for, OutputFormat, RenderOptions, ReportRenderer, TextRenderer, ZipRebuilder,
};
use zipdiff_parsers::{CompressionMethod, Parser, ZipParser, ZipWriter};
use zipdiff_tools::{compare_files, DiffConfig, DifferenceReport};

fn write_zip(dir: &Path, name: &str, files: &[(&str, &[u8])]) -> PathBuf {
    let mut writer = ZipWriter::new(Vec::new());
    for (entry, data) in files {
        writer
            .add_file(entry, data, CompressionMethod::Deflate, DosDateTime::from_parts(2022, 7, 1, 8, 0, 0))
            .unwrap();
    }
    let path = dir.join(name);
    std::fs::write(&path, writer.finish().unwrap()).unwrap();
    path
}

/// old: app/a.txt, app/b.txt, app/lib/x.jar{X}
/// new: app/b.txt (edited), app/c.txt, app/lib/x.jar{X, Y}
fn sample(dir: &Path) -> DifferenceReport {
    let inner_old = {
        let mut w = ZipWriter::new(Vec::new());
        w.add_file("X", b"x", CompressionMethod::Store, DosDateTime::default()).unwrap();
        w.finish().unwrap()
    };
    let inner_new = {
        let mut w = ZipWriter::new(Vec::new());
        w.add_file("X", b"x", CompressionMethod::Store, DosDateTime::default()).unwrap();
        w.add_file("Y", b"y", CompressionMethod::Store, DosDateTime::default()).unwrap();
        w.finish().unwrap()
    };

    let old = write_zip(
        dir,
        "old.zip",
        &[("app/a.txt", b"alpha"), ("app/b.txt", b"bravo"), ("app/lib/x.jar", inner_old.as_slice())],
    );
    let new = write_zip(
        dir,
        "new.zip",
        &[("app/b.txt", b"bravo, edited"), ("app/c.txt", b"charlie"), ("app/lib/x.jar", inner_new.as_slice())],
    );

    compare_files(&old, &new, &DiffConfig::default()).unwrap()
}

fn render_to_string(renderer: &dyn ReportRenderer, report: &DifferenceReport) -> String {
    let mut out = Vec::new();
    renderer.render(report, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_text_summary() {
    let dir = TempDir::new().unwrap();
    let report = sample(dir.path());
    let label2 = report.filename2().unwrap().to_string();

    let (first_jar, second_jar) = &report.changed()["app/lib/x.jar"];

    let expected = format!(
        "2 files were added to {label2}\n\
         \t[added] app/c.txt\n\
         \t[added] app/lib/x.jar!Y\n\
         1 file was removed from {label2}\n\
         \t[removed] app/a.txt\n\
         2 files changed\n\
         \t[changed] app/b.txt  ( size 5 : 13 )\n\
         \t[changed] app/lib/x.jar  ( size {} : {} )\n\
         Total differences: 5",
        first_jar.uncompressed_size, second_jar.uncompressed_size,
    );

    assert_eq!(TextRenderer::to_text(&report), expected);
}

#[test]
fn test_markup_formats_list_every_category() {
    let dir = TempDir::new().unwrap();
    let report = sample(dir.path());
    let options = RenderOptions::default();

    let html = render_to_string(renderer_for(OutputFormat::Html, &options).as_ref(), &report);
    assert!(html.contains("Added (2 entries)"));
    assert!(html.contains("<li>app/lib/x.jar!Y</li>"));
    assert!(html.contains("Changed (2 entries)"));

    let xml = render_to_string(renderer_for(OutputFormat::Xml, &options).as_ref(), &report);
    assert!(xml.contains("<removed>app/a.txt</removed>"));
    assert!(xml.contains("<changed>app/b.txt</changed>"));

    let json = render_to_string(renderer_for(OutputFormat::Json, &options).as_ref(), &report);
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["summary"]["total"], 5);
    assert_eq!(value["changed"][0]["path"], "app/b.txt");
    assert_eq!(value["changed"][0]["second"]["uncompressed_size"], 13);
}

#[test]
fn test_rebuilt_archive_holds_added_and_changed_entries() {
    let dir = TempDir::new().unwrap();
    let report = sample(dir.path());

    let selected: Vec<_> = ZipRebuilder::selected_entries(&report).into_iter().collect();
    assert_eq!(selected, ["app/b.txt", "app/c.txt", "app/lib/x.jar"]);

    let options = RenderOptions {
        skip_output_prefixes: 1,
    };
    let bytes = {
        let mut out = Vec::new();
        renderer_for(OutputFormat::Zip, &options)
            .render(&report, &mut out)
            .unwrap();
        out
    };

    let parser = ZipParser::new();
    let mut reader = Cursor::new(bytes);
    let rebuilt = parser.parse(&mut reader).unwrap();
    let mut names: Vec<_> = rebuilt.entries.iter().map(|e| e.path.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, ["b.txt", "c.txt", "lib/x.jar"]);

    let edited = rebuilt.get("b.txt").unwrap();
    assert_eq!(parser.extract_data(&mut reader, edited).unwrap(), b"bravo, edited");
}

#[test]
fn test_rebuild_skips_names_stripped_away() {
    let dir = TempDir::new().unwrap();
    let report = sample(dir.path());

    let rebuilder = ZipRebuilder::new(&RenderOptions {
        skip_output_prefixes: 5,
    });
    let mut out = Vec::new();
    rebuilder.render(&report, &mut out).unwrap();

    let rebuilt = ZipParser::new().parse(Cursor::new(out)).unwrap();
    assert_eq!(rebuilt.entry_count(), 0);
}

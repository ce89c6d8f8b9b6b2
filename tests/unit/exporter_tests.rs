/*!
 * Tests for export formats and the nbconvert exporter setup
 */

use std::str::FromStr;
use nbfill::exporter::{ExportFormat, Exporter, NbconvertExporter};

#[test]
fn test_export_format_fromStr_withAliases_shouldParse() {
    assert_eq!(ExportFormat::from_str("HTML").unwrap(), ExportFormat::Html);
    assert_eq!(ExportFormat::from_str("md").unwrap(), ExportFormat::Markdown);
    assert_eq!(ExportFormat::from_str("tex").unwrap(), ExportFormat::Latex);
    assert!(ExportFormat::from_str("docx").is_err());
}

#[test]
fn test_export_format_extension_shouldMatchRenderedFileType() {
    assert_eq!(ExportFormat::Html.extension(), "html");
    assert_eq!(ExportFormat::Markdown.extension(), "md");
    assert_eq!(ExportFormat::Latex.extension(), "tex");
    assert_eq!(ExportFormat::Markdown.to_string(), "markdown");
}

#[test]
fn test_nbconvert_exporter_withMarkdown_shouldBuildArgsAndExtension() {
    let exporter = NbconvertExporter::new(ExportFormat::Markdown);

    assert_eq!(exporter.file_extension(), "md");
    assert_eq!(
        exporter.build_args(),
        vec!["nbconvert", "--to", "markdown", "--stdin", "--stdout"]
    );
}

#[test]
fn test_nbconvert_exporter_html_shouldDefaultToHtml() {
    assert_eq!(NbconvertExporter::html().format(), ExportFormat::Html);
    assert_eq!(NbconvertExporter::html().file_extension(), "html");
}

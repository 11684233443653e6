//! Serialized shape of conversion results.

use crate::helpers::{TestConverter, TestHost, letter_pdf};
use pdf2img::PdfConversionResult;

#[test]
fn test_failure_shape() {
    let result = PdfConversionResult::failure("Canvas context not available");

    insta::assert_json_snapshot!(result, @r###"
    {
      "imageUrl": "",
      "file": null,
      "error": "Canvas context not available"
    }
    "###);
}

#[test]
fn test_success_shape_omits_error() {
    let harness = TestConverter::new(TestHost::default());
    let result = harness.convert(&letter_pdf("report.pdf"));

    insta::assert_json_snapshot!(result, {
        ".imageUrl" => "[url]",
        ".file.size" => "[size]"
    }, @r###"
    {
      "imageUrl": "[url]",
      "file": {
        "name": "report.png",
        "type": "image/png",
        "size": "[size]"
      }
    }
    "###);
}

#[test]
fn test_failure_never_carries_partial_output() {
    let result = PdfConversionResult::failure("boom");
    assert!(result.file.is_none());
    assert!(result.image_url.is_empty());
    assert!(!result.is_success());
}

use super::*;
use crate::foundation::diagnostics::FailureReason;

#[test]
fn report_lists_every_expected_path_and_remediation() {
    let report = ShareReport::new(vec![
        ItemDiagnostic::new("4", "Resell/product_4_Resell.png", FailureReason::AssetMissing),
        ItemDiagnostic::new(
            "9",
            "Resell/product_9_Resell.png",
            FailureReason::ResolutionFailure,
        ),
    ]);
    let text = report.to_string();
    assert!(text.contains("2 selected card(s)"));
    assert!(text.contains("  - Resell/product_4_Resell.png (asset missing)"));
    assert!(text.contains("  - Resell/product_9_Resell.png (resolution failure)"));
    assert!(text.contains("{folder}/product_{id}_{folder}.png"));
    assert!(text.contains("writable"));
}

#[test]
fn empty_report_explains_empty_selection() {
    assert_eq!(
        ShareReport::default().to_string(),
        "nothing to share: no products were selected"
    );
}

//! File and snapshot names

use chrono::{DateTime, NaiveDate, TimeZone};

/// Extension of generated reports
pub const REPORT_EXTENSION: &str = "pdf";

/// Contractor name made safe for a file name: whitespace runs become `_`,
/// path separators become `-`
pub fn filename_component(contractor: &str) -> String {
    contractor
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .replace(['/', '\\'], "-")
}

/// `LAUDO_{contractor}_{YYYYMMDD}_v{version}.pdf`
pub fn report_filename(contractor: &str, date: NaiveDate, version: u32) -> String {
    format!(
        "LAUDO_{}_{}_v{}.{}",
        filename_component(contractor),
        date.format("%Y%m%d"),
        version,
        REPORT_EXTENSION
    )
}

/// `Rascunho_{YYYYMMDD_HHMMSS}`
pub fn draft_name<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("Rascunho_{}", now.format("%Y%m%d_%H%M%S"))
}

/// `backup_laudos_{YYYYMMDD_HHMMSS}.json`
pub fn backup_filename<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("backup_laudos_{}.json", now.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_report_filename() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 11).unwrap();
        assert_eq!(
            report_filename("Ser Educacional  S.A", date, 2),
            "LAUDO_Ser_Educacional_S.A_20250711_v2.pdf"
        );
    }

    #[test]
    fn test_path_separators_are_replaced() {
        assert_eq!(filename_component(" Loja 1/2 \\ Centro "), "Loja_1-2_-_Centro");
    }

    #[test]
    fn test_versions_differ_only_in_suffix() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        let v1 = report_filename("Acme", date, 1);
        let v2 = report_filename("Acme", date, 2);
        assert_ne!(v1, v2);
        assert_eq!(v1.replace("_v1.", "_v2."), v2);
    }

    #[test]
    fn test_draft_and_backup_names() {
        let now = Utc.with_ymd_and_hms(2025, 7, 11, 9, 5, 3).unwrap();
        assert_eq!(draft_name(&now), "Rascunho_20250711_090503");
        assert_eq!(backup_filename(&now), "backup_laudos_20250711_090503.json");
    }
}

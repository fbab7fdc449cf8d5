/// Arrow schema for the consolidated credit report.
pub mod report {
    use arrow::datatypes::{DataType, Field, Schema};

    use crate::metrics::DISPLAY_SCALE;

    /// Precision of the metric columns (maximum for `Decimal128`).
    pub const METRIC_PRECISION: u8 = 38;

    /// Column order of the report. Fixed across runs.
    pub const COLUMNS: [&str; 7] = [
        "company_id",
        "current_ratio",
        "net_margin",
        "revenue_growth",
        "decision",
        "rationale",
        "status",
    ];

    pub fn metric_type() -> DataType {
        DataType::Decimal128(METRIC_PRECISION, DISPLAY_SCALE as i8)
    }

    /// Schema for report rows. Undefined metrics and missing decisions are nulls.
    pub fn report_schema() -> Schema {
        Schema::new(vec![
            Field::new("company_id", DataType::Utf8, false),
            Field::new("current_ratio", metric_type(), true),
            Field::new("net_margin", metric_type(), true),
            Field::new("revenue_growth", metric_type(), true),
            Field::new("decision", DataType::Utf8, true),
            Field::new("rationale", DataType::Utf8, false),
            Field::new("status", DataType::Utf8, false),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::report;

    #[test]
    fn report_schema_matches_column_order() {
        let schema = report::report_schema();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(names, report::COLUMNS);
    }

    #[test]
    fn metric_columns_are_nullable_decimals() {
        let schema = report::report_schema();
        for name in ["current_ratio", "net_margin", "revenue_growth"] {
            let field = schema.field_with_name(name).unwrap();
            assert!(field.is_nullable());
            assert_eq!(field.data_type(), &report::metric_type());
        }
        assert!(!schema.field_with_name("status").unwrap().is_nullable());
    }
}

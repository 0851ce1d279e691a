use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct MonthlyReportQuery {
    /// `YYYY-MM`, defaults to the current month.
    pub month: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnnualReportQuery {
    pub year: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportsPageQuery {
    pub month: Option<String>,
    pub year: Option<i32>,
}

use chrono::NaiveDate;
use clap::Args;
use credit_risk_core::domain::application::{
    EmploymentLength, Grade, HomeOwnership, LoanApplicationInput, Purpose, State, SubGrade, Term,
    ValidationError, VerificationStatus,
};

/// Every control of the loan application form, with the form's defaults.
#[derive(Debug, Clone, Args)]
pub struct ApplicationForm {
    /// Loan amount in dollars (1000-50000).
    #[arg(long, default_value_t = 10_000.0, help_heading = "Financial")]
    pub loan_amnt: f64,

    /// Interest rate in percent (5-30).
    #[arg(long, default_value_t = 12.5, help_heading = "Financial")]
    pub int_rate: f64,

    /// Monthly installment in dollars (100-1500).
    #[arg(long, default_value_t = 350.0, help_heading = "Financial")]
    pub installment: f64,

    /// Annual income in dollars (20000-200000).
    #[arg(long, default_value_t = 75_000.0, help_heading = "Financial")]
    pub annual_inc: f64,

    /// Debt-to-income ratio (0-40).
    #[arg(long, default_value_t = 15.5, help_heading = "Financial")]
    pub dti: f64,

    /// Revolving balance in dollars (0-50000).
    #[arg(long, default_value_t = 15_000.0, help_heading = "Credit history")]
    pub revol_bal: f64,

    /// Revolving utilization in percent (0-100).
    #[arg(long, default_value_t = 45.2, help_heading = "Credit history")]
    pub revol_util: f64,

    /// Revolving utilization trend (-10 to 10).
    #[arg(long, default_value_t = 0.1, allow_negative_numbers = true, help_heading = "Credit history")]
    pub revol_utilization_trend: f64,

    #[arg(long, default_value_t = 25, value_parser = clap::value_parser!(u32).range(1..=100), help_heading = "Credit history")]
    pub total_acc: u32,

    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=50), help_heading = "Credit history")]
    pub open_acc: u32,

    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..=10), help_heading = "Credit history")]
    pub pub_rec: u32,

    /// Credit inquiries in the last 6 months.
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u32).range(0..=10), help_heading = "Credit history")]
    pub inq_last_6mths: u32,

    /// Delinquencies in the last 2 years.
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..=10), help_heading = "Credit history")]
    pub delinq_2yrs: u32,

    /// Credit history age in years (1-30).
    #[arg(long, default_value_t = 8.5, help_heading = "Credit history")]
    pub credit_age: f64,

    /// Average FICO score (300-850).
    #[arg(long, default_value_t = 680.0, help_heading = "Credit history")]
    pub fico_avg: f64,

    /// "< 1 year", "1 year" .. "9 years", "10+ years".
    #[arg(long, default_value = "< 1 year", help_heading = "Personal & loan")]
    pub emp_length: EmploymentLength,

    /// "Verified", "Source Verified" or "Not Verified".
    #[arg(long, default_value = "Verified", help_heading = "Personal & loan")]
    pub verification_status: VerificationStatus,

    /// MORTGAGE, RENT, OWN or NONE.
    #[arg(long, default_value = "MORTGAGE", help_heading = "Personal & loan")]
    pub home_ownership: HomeOwnership,

    /// debt_consolidation, credit_card, home_improvement, other, major_purchase,
    /// medical, small_business, vacation or wedding.
    #[arg(long, default_value = "debt_consolidation", help_heading = "Personal & loan")]
    pub purpose: Purpose,

    /// Loan grade A-G.
    #[arg(long, default_value = "A", help_heading = "Personal & loan")]
    pub grade: Grade,

    /// Sub-grade within the grade, as `B3` or just the level `3`. Defaults to level 1.
    #[arg(long, help_heading = "Personal & loan")]
    pub sub_grade: Option<String>,

    /// CA, NY, TX, FL, IL, PA, OH, GA, NC or MI.
    #[arg(long, default_value = "CA", help_heading = "Personal & loan")]
    pub addr_state: State,

    /// Loan term in months: 36 or 60.
    #[arg(long = "term", default_value = "36", help_heading = "Personal & loan")]
    pub term: Term,

    /// Application date (YYYY-MM-DD). Defaults to today.
    #[arg(long, help_heading = "Personal & loan")]
    pub issue_d: Option<NaiveDate>,
}

impl ApplicationForm {
    pub fn sub_grade(&self) -> Result<SubGrade, ValidationError> {
        match self.sub_grade.as_deref().map(str::trim) {
            None => Ok(SubGrade::options(self.grade)[0]),
            Some(level) if level.len() == 1 => {
                let digit = level
                    .parse::<u8>()
                    .map_err(|_| ValidationError::InvalidSubGrade {
                        value: level.to_string(),
                    })?;
                SubGrade::new(self.grade, digit)
            }
            Some(full) => full.parse(),
        }
    }

    pub fn to_input(&self) -> Result<LoanApplicationInput, ValidationError> {
        Ok(LoanApplicationInput {
            loan_amnt: self.loan_amnt,
            int_rate: self.int_rate,
            installment: self.installment,
            annual_inc: self.annual_inc,
            dti: self.dti,
            revol_bal: self.revol_bal,
            revol_util: self.revol_util,
            revol_utilization_trend: self.revol_utilization_trend,
            total_acc: self.total_acc,
            open_acc: self.open_acc,
            pub_rec: self.pub_rec,
            inq_last_6mths: self.inq_last_6mths,
            delinq_2yrs: self.delinq_2yrs,
            credit_age: self.credit_age,
            fico_avg: self.fico_avg,
            emp_length: self.emp_length,
            verification_status: self.verification_status,
            home_ownership: self.home_ownership,
            purpose: self.purpose,
            grade: self.grade,
            sub_grade: self.sub_grade()?,
            addr_state: self.addr_state,
            term: self.term,
            issue_d: self
                .issue_d
                .unwrap_or_else(|| chrono::Utc::now().date_naive()),
        })
    }
}

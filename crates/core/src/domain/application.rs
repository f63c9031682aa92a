use super::categorical;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

categorical! {
    EmploymentLength as "employment length" {
        LessThanOneYear => "< 1 year",
        OneYear => "1 year",
        TwoYears => "2 years",
        ThreeYears => "3 years",
        FourYears => "4 years",
        FiveYears => "5 years",
        SixYears => "6 years",
        SevenYears => "7 years",
        EightYears => "8 years",
        NineYears => "9 years",
        TenPlusYears => "10+ years",
    }
}

categorical! {
    VerificationStatus as "verification status" {
        Verified => "Verified",
        SourceVerified => "Source Verified",
        NotVerified => "Not Verified",
    }
}

categorical! {
    HomeOwnership as "home ownership" {
        Mortgage => "MORTGAGE",
        Rent => "RENT",
        Own => "OWN",
        None => "NONE",
    }
}

categorical! {
    Purpose as "loan purpose" {
        DebtConsolidation => "debt_consolidation",
        CreditCard => "credit_card",
        HomeImprovement => "home_improvement",
        Other => "other",
        MajorPurchase => "major_purchase",
        Medical => "medical",
        SmallBusiness => "small_business",
        Vacation => "vacation",
        Wedding => "wedding",
    }
}

categorical! {
    Grade as "grade" {
        A => "A",
        B => "B",
        C => "C",
        D => "D",
        E => "E",
        F => "F",
        G => "G",
    }
}

categorical! {
    /// States the scoring model was trained on.
    State as "state" {
        CA => "CA",
        NY => "NY",
        TX => "TX",
        FL => "FL",
        IL => "IL",
        PA => "PA",
        OH => "OH",
        GA => "GA",
        NC => "NC",
        MI => "MI",
    }
}

/// Grade plus a level digit in `1..=5`, written `B3` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct SubGrade {
    grade: Grade,
    level: u8,
}

impl SubGrade {
    pub const LEVELS: RangeInclusive<u8> = 1..=5;

    pub fn new(grade: Grade, level: u8) -> Result<Self, ValidationError> {
        if !Self::LEVELS.contains(&level) {
            return Err(ValidationError::InvalidSubGrade {
                value: format!("{grade}{level}"),
            });
        }
        Ok(Self { grade, level })
    }

    /// The five sub-grades offered once `grade` is selected.
    pub fn options(grade: Grade) -> [SubGrade; 5] {
        [1, 2, 3, 4, 5].map(|level| SubGrade { grade, level })
    }

    pub fn grade(self) -> Grade {
        self.grade
    }

    pub fn level(self) -> u8 {
        self.level
    }
}

impl fmt::Display for SubGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.grade, self.level)
    }
}

impl std::str::FromStr for SubGrade {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidSubGrade {
            value: s.to_string(),
        };
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let (Some(letter), Some(digit), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(invalid());
        };
        let grade = letter
            .to_string()
            .parse::<Grade>()
            .map_err(|_| invalid())?;
        let level = digit.to_digit(10).ok_or_else(invalid)? as u8;
        Self::new(grade, level).map_err(|_| invalid())
    }
}

impl From<SubGrade> for String {
    fn from(value: SubGrade) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for SubGrade {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Loan term; only 36 and 60 months are offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum Term {
    Months36,
    Months60,
}

impl Term {
    pub fn months(self) -> u16 {
        match self {
            Term::Months36 => 36,
            Term::Months60 => 60,
        }
    }
}

impl From<Term> for u16 {
    fn from(value: Term) -> Self {
        value.months()
    }
}

impl TryFrom<u16> for Term {
    type Error = ValidationError;

    fn try_from(months: u16) -> Result<Self, Self::Error> {
        match months {
            36 => Ok(Term::Months36),
            60 => Ok(Term::Months60),
            months => Err(ValidationError::InvalidTerm { months }),
        }
    }
}

impl std::str::FromStr for Term {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let months = s
            .trim()
            .parse::<u16>()
            .map_err(|_| ValidationError::UnparseableTerm {
                value: s.to_string(),
            })?;
        Term::try_from(months)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} months", self.months())
    }
}

/// Accepted range for every numeric control.
pub mod limits {
    use std::ops::RangeInclusive;

    pub const LOAN_AMNT: RangeInclusive<f64> = 1_000.0..=50_000.0;
    pub const INT_RATE: RangeInclusive<f64> = 5.0..=30.0;
    pub const INSTALLMENT: RangeInclusive<f64> = 100.0..=1_500.0;
    pub const ANNUAL_INC: RangeInclusive<f64> = 20_000.0..=200_000.0;
    pub const DTI: RangeInclusive<f64> = 0.0..=40.0;
    pub const REVOL_BAL: RangeInclusive<f64> = 0.0..=50_000.0;
    pub const REVOL_UTIL: RangeInclusive<f64> = 0.0..=100.0;
    pub const REVOL_UTILIZATION_TREND: RangeInclusive<f64> = -10.0..=10.0;
    pub const CREDIT_AGE: RangeInclusive<f64> = 1.0..=30.0;
    pub const FICO_AVG: RangeInclusive<f64> = 300.0..=850.0;

    pub const TOTAL_ACC: RangeInclusive<u32> = 1..=100;
    pub const OPEN_ACC: RangeInclusive<u32> = 1..=50;
    pub const PUB_REC: RangeInclusive<u32> = 0..=10;
    pub const INQ_LAST_6MTHS: RangeInclusive<u32> = 0..=10;
    pub const DELINQ_2YRS: RangeInclusive<u32> = 0..=10;
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    NotFinite {
        field: &'static str,
    },
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    SubGradeMismatch {
        grade: Grade,
        sub_grade: SubGrade,
    },
    InvalidSubGrade {
        value: String,
    },
    InvalidTerm {
        months: u16,
    },
    UnparseableTerm {
        value: String,
    },
    DerivedMismatch {
        field: &'static str,
        expected: f64,
        actual: f64,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NotFinite { field } => write!(f, "{field} must be a finite number"),
            ValidationError::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(f, "{field} must be between {min} and {max} (got {value})"),
            ValidationError::SubGradeMismatch { grade, sub_grade } => write!(
                f,
                "sub-grade {sub_grade} does not belong to grade {grade} (expected one of {grade}1..{grade}5)"
            ),
            ValidationError::InvalidSubGrade { value } => {
                write!(f, "invalid sub-grade '{value}' (expected a grade A-G followed by 1-5)")
            }
            ValidationError::InvalidTerm { months } => {
                write!(f, "loan term must be 36 or 60 months (got {months})")
            }
            ValidationError::UnparseableTerm { value } => {
                write!(f, "loan term must be 36 or 60 months (got '{value}')")
            }
            ValidationError::DerivedMismatch {
                field,
                expected,
                actual,
            } => write!(f, "{field} is inconsistent with its inputs: expected {expected}, got {actual}"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Natural log that returns 0 for non-positive or non-finite input.
pub fn safe_ln(x: f64) -> f64 {
    if x > 0.0 && x.is_finite() {
        x.ln()
    } else {
        0.0
    }
}

/// Monthly installment over monthly income; 0 when income is not positive.
pub fn payment_to_income(installment: f64, annual_inc: f64) -> f64 {
    if annual_inc > 0.0 && annual_inc.is_finite() {
        installment / (annual_inc / 12.0)
    } else {
        0.0
    }
}

/// Raw values captured from the application form, before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct LoanApplicationInput {
    pub loan_amnt: f64,
    pub int_rate: f64,
    pub installment: f64,
    pub annual_inc: f64,
    pub dti: f64,
    pub revol_bal: f64,
    pub revol_util: f64,
    pub revol_utilization_trend: f64,
    pub total_acc: u32,
    pub open_acc: u32,
    pub pub_rec: u32,
    pub inq_last_6mths: u32,
    pub delinq_2yrs: u32,
    pub credit_age: f64,
    pub fico_avg: f64,
    pub emp_length: EmploymentLength,
    pub verification_status: VerificationStatus,
    pub home_ownership: HomeOwnership,
    pub purpose: Purpose,
    pub grade: Grade,
    pub sub_grade: SubGrade,
    pub addr_state: State,
    pub term: Term,
    pub issue_d: NaiveDate,
}

impl Default for LoanApplicationInput {
    fn default() -> Self {
        Self {
            loan_amnt: 10_000.0,
            int_rate: 12.5,
            installment: 350.0,
            annual_inc: 75_000.0,
            dti: 15.5,
            revol_bal: 15_000.0,
            revol_util: 45.2,
            revol_utilization_trend: 0.1,
            total_acc: 25,
            open_acc: 10,
            pub_rec: 0,
            inq_last_6mths: 2,
            delinq_2yrs: 0,
            credit_age: 8.5,
            fico_avg: 680.0,
            emp_length: EmploymentLength::LessThanOneYear,
            verification_status: VerificationStatus::Verified,
            home_ownership: HomeOwnership::Mortgage,
            purpose: Purpose::DebtConsolidation,
            grade: Grade::A,
            sub_grade: SubGrade {
                grade: Grade::A,
                level: 1,
            },
            addr_state: State::CA,
            term: Term::Months36,
            issue_d: chrono::Utc::now().date_naive(),
        }
    }
}

impl LoanApplicationInput {
    /// Validates the captured values and derives the computed features.
    pub fn build(&self) -> Result<LoanApplication, ValidationError> {
        check_inputs(self)?;

        Ok(LoanApplication {
            loan_amnt: self.loan_amnt,
            int_rate: self.int_rate,
            installment: self.installment,
            annual_inc: self.annual_inc,
            dti: self.dti,
            revol_bal: self.revol_bal,
            revol_util: self.revol_util,
            total_acc: self.total_acc,
            open_acc: self.open_acc,
            pub_rec: self.pub_rec,
            inq_last_6mths: self.inq_last_6mths,
            delinq_2yrs: self.delinq_2yrs,
            emp_length: self.emp_length,
            verification_status: self.verification_status,
            home_ownership: self.home_ownership,
            purpose: self.purpose,
            grade: self.grade,
            sub_grade: self.sub_grade,
            addr_state: self.addr_state,
            issue_d: self.issue_d,
            credit_age: self.credit_age,
            payment_to_income: payment_to_income(self.installment, self.annual_inc),
            revol_utilization_trend: self.revol_utilization_trend,
            log_annual_inc: safe_ln(self.annual_inc),
            log_loan_amnt: safe_ln(self.loan_amnt),
            log_revol_bal: safe_ln(self.revol_bal),
            term_months: self.term,
            fico_avg: self.fico_avg,
        })
    }
}

/// Validated feature vector, serialized field-for-field as the
/// `POST /predict` request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[non_exhaustive]
pub struct LoanApplication {
    pub loan_amnt: f64,
    pub int_rate: f64,
    pub installment: f64,
    pub annual_inc: f64,
    pub dti: f64,
    pub revol_bal: f64,
    pub revol_util: f64,
    pub total_acc: u32,
    pub open_acc: u32,
    pub pub_rec: u32,
    pub inq_last_6mths: u32,
    pub delinq_2yrs: u32,
    pub emp_length: EmploymentLength,
    pub verification_status: VerificationStatus,
    pub home_ownership: HomeOwnership,
    pub purpose: Purpose,
    pub grade: Grade,
    pub sub_grade: SubGrade,
    pub addr_state: State,
    pub issue_d: NaiveDate,
    pub credit_age: f64,
    pub payment_to_income: f64,
    pub revol_utilization_trend: f64,
    pub log_annual_inc: f64,
    pub log_loan_amnt: f64,
    pub log_revol_bal: f64,
    pub term_months: Term,
    pub fico_avg: f64,
}

impl LoanApplication {
    /// Re-checks every invariant, including derived-field consistency.
    /// Records produced by [`LoanApplicationInput::build`] always pass; this
    /// guards records that arrived through deserialization.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_inputs(&self.to_input())?;

        let derived = [
            (
                "payment_to_income",
                payment_to_income(self.installment, self.annual_inc),
                self.payment_to_income,
            ),
            ("log_annual_inc", safe_ln(self.annual_inc), self.log_annual_inc),
            ("log_loan_amnt", safe_ln(self.loan_amnt), self.log_loan_amnt),
            ("log_revol_bal", safe_ln(self.revol_bal), self.log_revol_bal),
        ];
        for (field, expected, actual) in derived {
            if !actual.is_finite() {
                return Err(ValidationError::NotFinite { field });
            }
            if (expected - actual).abs() > 1e-9 * expected.abs().max(1.0) {
                return Err(ValidationError::DerivedMismatch {
                    field,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }

    pub fn to_input(&self) -> LoanApplicationInput {
        LoanApplicationInput {
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
            sub_grade: self.sub_grade,
            addr_state: self.addr_state,
            term: self.term_months,
            issue_d: self.issue_d,
        }
    }
}

fn check_inputs(input: &LoanApplicationInput) -> Result<(), ValidationError> {
    check_f64("loan_amnt", input.loan_amnt, limits::LOAN_AMNT)?;
    check_f64("int_rate", input.int_rate, limits::INT_RATE)?;
    check_f64("installment", input.installment, limits::INSTALLMENT)?;
    check_f64("annual_inc", input.annual_inc, limits::ANNUAL_INC)?;
    check_f64("dti", input.dti, limits::DTI)?;
    check_f64("revol_bal", input.revol_bal, limits::REVOL_BAL)?;
    check_f64("revol_util", input.revol_util, limits::REVOL_UTIL)?;
    check_f64(
        "revol_utilization_trend",
        input.revol_utilization_trend,
        limits::REVOL_UTILIZATION_TREND,
    )?;
    check_f64("credit_age", input.credit_age, limits::CREDIT_AGE)?;
    check_f64("fico_avg", input.fico_avg, limits::FICO_AVG)?;

    check_u32("total_acc", input.total_acc, limits::TOTAL_ACC)?;
    check_u32("open_acc", input.open_acc, limits::OPEN_ACC)?;
    check_u32("pub_rec", input.pub_rec, limits::PUB_REC)?;
    check_u32("inq_last_6mths", input.inq_last_6mths, limits::INQ_LAST_6MTHS)?;
    check_u32("delinq_2yrs", input.delinq_2yrs, limits::DELINQ_2YRS)?;

    if input.sub_grade.grade() != input.grade {
        return Err(ValidationError::SubGradeMismatch {
            grade: input.grade,
            sub_grade: input.sub_grade,
        });
    }
    Ok(())
}

fn check_f64(
    field: &'static str,
    value: f64,
    range: RangeInclusive<f64>,
) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if !range.contains(&value) {
        return Err(ValidationError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        });
    }
    Ok(())
}

fn check_u32(
    field: &'static str,
    value: u32,
    range: RangeInclusive<u32>,
) -> Result<(), ValidationError> {
    if !range.contains(&value) {
        return Err(ValidationError::OutOfRange {
            field,
            value: f64::from(value),
            min: f64::from(*range.start()),
            max: f64::from(*range.end()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeSet;

    fn input() -> LoanApplicationInput {
        LoanApplicationInput {
            issue_d: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            ..LoanApplicationInput::default()
        }
    }

    #[test]
    fn derived_fields_are_zero_for_non_positive_income() {
        for income in [0.0, -0.0, -1.0, -75_000.0, f64::MIN, f64::NEG_INFINITY, f64::NAN] {
            assert_eq!(safe_ln(income), 0.0, "log of {income}");
            assert_eq!(payment_to_income(350.0, income), 0.0, "pti for {income}");
        }
    }

    #[test]
    fn builds_derived_fields_from_inputs() {
        let app = input().build().unwrap();
        assert!((app.payment_to_income - 350.0 / (75_000.0 / 12.0)).abs() < 1e-12);
        assert!((app.log_annual_inc - 75_000f64.ln()).abs() < 1e-12);
        assert!((app.log_loan_amnt - 10_000f64.ln()).abs() < 1e-12);
        assert!((app.log_revol_bal - 15_000f64.ln()).abs() < 1e-12);
        app.validate().unwrap();
    }

    #[test]
    fn zero_revolving_balance_logs_to_zero() {
        let app = LoanApplicationInput {
            revol_bal: 0.0,
            ..input()
        }
        .build()
        .unwrap();
        assert_eq!(app.log_revol_bal, 0.0);
    }

    #[test]
    fn sub_grade_accepted_only_under_its_own_grade() {
        for &selected in Grade::ALL {
            for &letter in Grade::ALL {
                for level in SubGrade::LEVELS {
                    let sub_grade: SubGrade = format!("{letter}{level}").parse().unwrap();
                    let res = LoanApplicationInput {
                        grade: selected,
                        sub_grade,
                        ..input()
                    }
                    .build();
                    if selected == letter {
                        assert!(res.is_ok(), "{sub_grade} under {selected}");
                    } else {
                        assert_eq!(
                            res.unwrap_err(),
                            ValidationError::SubGradeMismatch {
                                grade: selected,
                                sub_grade
                            }
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn sub_grade_options_follow_grade() {
        let options: Vec<String> = SubGrade::options(Grade::C)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(options, ["C1", "C2", "C3", "C4", "C5"]);
    }

    #[test]
    fn rejects_malformed_sub_grades_and_terms() {
        for bad in ["", "A", "A0", "A6", "H1", "AA", "A12", "a1"] {
            assert!(bad.parse::<SubGrade>().is_err(), "{bad:?}");
        }
        assert_eq!(
            Term::try_from(48u16),
            Err(ValidationError::InvalidTerm { months: 48 })
        );
        assert_eq!("60".parse::<Term>(), Ok(Term::Months60));
        assert_eq!(
            "48".parse::<Term>(),
            Err(ValidationError::InvalidTerm { months: 48 })
        );
    }

    #[test]
    fn unparseable_term_reports_the_text_given() {
        for raw in ["abc", "70000", "-36", ""] {
            let err = raw.parse::<Term>().unwrap_err();
            assert_eq!(
                err,
                ValidationError::UnparseableTerm {
                    value: raw.to_string()
                }
            );
            assert!(err.to_string().contains(&format!("'{raw}'")), "{err}");
            assert!(!err.to_string().contains("got 0"), "{err}");
        }
    }

    #[test]
    fn rejects_out_of_range_and_non_finite_values() {
        let err = LoanApplicationInput {
            fico_avg: 900.0,
            ..input()
        }
        .build()
        .unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { field: "fico_avg", .. }));

        let err = LoanApplicationInput {
            int_rate: f64::NAN,
            ..input()
        }
        .build()
        .unwrap_err();
        assert_eq!(err, ValidationError::NotFinite { field: "int_rate" });

        let err = LoanApplicationInput {
            open_acc: 0,
            ..input()
        }
        .build()
        .unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { field: "open_acc", .. }));
    }

    #[test]
    fn parses_categorical_wire_strings() {
        assert_eq!(
            "10+ years".parse::<EmploymentLength>(),
            Ok(EmploymentLength::TenPlusYears)
        );
        assert_eq!(
            "Source Verified".parse::<VerificationStatus>(),
            Ok(VerificationStatus::SourceVerified)
        );
        assert_eq!("small_business".parse::<Purpose>(), Ok(Purpose::SmallBusiness));
        let err = "WA".parse::<State>().unwrap_err();
        assert_eq!(err.field, "state");
        assert_eq!(EmploymentLength::ALL.len(), 11);
        assert_eq!(Purpose::ALL.len(), 9);
        assert_eq!(State::ALL.len(), 10);
    }

    #[test]
    fn payload_has_exactly_the_request_fields() {
        let value = serde_json::to_value(input().build().unwrap()).unwrap();
        let keys: BTreeSet<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        let expected: BTreeSet<&str> = [
            "loan_amnt",
            "int_rate",
            "installment",
            "annual_inc",
            "dti",
            "revol_bal",
            "revol_util",
            "total_acc",
            "open_acc",
            "pub_rec",
            "inq_last_6mths",
            "delinq_2yrs",
            "emp_length",
            "verification_status",
            "home_ownership",
            "purpose",
            "grade",
            "sub_grade",
            "addr_state",
            "issue_d",
            "credit_age",
            "payment_to_income",
            "revol_utilization_trend",
            "log_annual_inc",
            "log_loan_amnt",
            "log_revol_bal",
            "term_months",
            "fico_avg",
        ]
        .into_iter()
        .collect();
        assert_eq!(keys, expected);

        assert_eq!(value["issue_d"], json!("2026-03-14"));
        assert_eq!(value["term_months"], json!(36));
        assert_eq!(value["sub_grade"], json!("A1"));
        assert_eq!(value["emp_length"], json!("< 1 year"));
        assert_eq!(value["total_acc"], json!(25));
        assert_eq!(value["loan_amnt"], json!(10000.0));
    }

    #[test]
    fn payload_round_trips() {
        let original = LoanApplicationInput {
            int_rate: 17.3,
            dti: 22.7,
            revol_util: 81.9,
            revol_utilization_trend: -3.3,
            grade: Grade::D,
            sub_grade: "D4".parse().unwrap(),
            term: Term::Months60,
            addr_state: State::NC,
            ..input()
        }
        .build()
        .unwrap();

        let text = serde_json::to_string(&original).unwrap();
        let back: LoanApplication = serde_json::from_str(&text).unwrap();

        let close = |a: f64, b: f64| (a - b).abs() <= 1e-12 * a.abs().max(1.0);
        assert!(close(original.int_rate, back.int_rate));
        assert!(close(original.dti, back.dti));
        assert!(close(original.revol_util, back.revol_util));
        assert!(close(original.revol_utilization_trend, back.revol_utilization_trend));
        assert!(close(original.payment_to_income, back.payment_to_income));
        assert!(close(original.log_annual_inc, back.log_annual_inc));
        assert!(close(original.log_loan_amnt, back.log_loan_amnt));
        assert!(close(original.log_revol_bal, back.log_revol_bal));
        assert_eq!(original.issue_d, back.issue_d);
        assert_eq!(original.sub_grade, back.sub_grade);
        assert_eq!(original.term_months, back.term_months);
        assert_eq!(original.addr_state, back.addr_state);
        assert_eq!(original.total_acc, back.total_acc);
        back.validate().unwrap();
    }

    #[test]
    fn deserialized_record_with_inconsistent_derived_field_is_rejected() {
        let mut value = serde_json::to_value(input().build().unwrap()).unwrap();
        value["log_annual_inc"] = json!(1.0);
        let app: LoanApplication = serde_json::from_value(value).unwrap();
        assert!(matches!(
            app.validate(),
            Err(ValidationError::DerivedMismatch { field: "log_annual_inc", .. })
        ));
    }

    #[test]
    fn deserialize_rejects_unknown_categories() {
        let mut value = serde_json::to_value(input().build().unwrap()).unwrap();
        value["home_ownership"] = json!("LEASE");
        assert!(serde_json::from_value::<LoanApplication>(value).is_err());
    }
}

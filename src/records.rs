use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

/// Input root consumed by the CLI: one user's records plus their tax profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct RecordsInput {
    #[serde(default)]
    pub income: Vec<IncomeEvent>,
    #[serde(default)]
    pub expenses: Vec<ExpenseRecord>,
    #[serde(default)]
    pub mileage: Vec<MileageRecord>,
    /// Absent is a valid state: tax totals are withheld, not faked as zero.
    #[serde(default)]
    pub tax_profile: Option<TaxProfile>,
}

/// A single gig: one paid piece of work.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IncomeEvent {
    /// Date of the gig (YYYY-MM-DD). An unparseable or missing date keeps
    /// the record out of every aggregate rather than shifting totals.
    #[serde(default, deserialize_with = "lenient_date")]
    #[schemars(with = "Option<String>")]
    pub date: Option<NaiveDate>,
    #[schemars(with = "f64")]
    pub gross_amount: Decimal,
    #[serde(default)]
    #[schemars(with = "f64")]
    pub tips: Decimal,
    #[serde(default)]
    #[schemars(with = "f64")]
    pub per_diem: Decimal,
    #[serde(default)]
    #[schemars(with = "f64")]
    pub other_income: Decimal,
    #[serde(default)]
    #[schemars(with = "f64")]
    pub fees: Decimal,
    #[serde(default)]
    pub payer_name: Option<String>,
    /// Amounts paid out to subcontractors for this gig (a cost, not income).
    #[serde(default)]
    pub subcontractor_payments: Vec<SubcontractorPayment>,
}

impl IncomeEvent {
    /// Net contribution of this gig: gross + tips + per diem + other − fees.
    pub fn net_income(&self) -> Decimal {
        self.gross_amount + self.tips + self.per_diem + self.other_income - self.fees
    }

    pub fn subcontractor_total(&self) -> Decimal {
        self.subcontractor_payments.iter().map(|p| p.amount).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SubcontractorPayment {
    #[serde(default)]
    pub description: Option<String>,
    #[schemars(with = "f64")]
    pub amount: Decimal,
}

/// A business expense with a free-form category string.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExpenseRecord {
    #[serde(default, deserialize_with = "lenient_date")]
    #[schemars(with = "Option<String>")]
    pub date: Option<NaiveDate>,
    pub category: String,
    #[schemars(with = "f64")]
    pub amount: Decimal,
}

impl ExpenseRecord {
    pub fn taxonomy_category(&self) -> ExpenseCategory {
        ExpenseCategory::from_raw(&self.category)
    }
}

/// Business miles driven; the deduction is miles × the versioned per-mile rate.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MileageRecord {
    #[serde(default, deserialize_with = "lenient_date")]
    #[schemars(with = "Option<String>")]
    pub date: Option<NaiveDate>,
    #[schemars(with = "f64")]
    pub miles: Decimal,
}

/// Jurisdictional profile required for tax totals.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TaxProfile {
    pub filing_status: FilingStatus,
    /// Two-letter state code, e.g. "TX" or "MD".
    pub state: String,
    /// Required only for states with county-level tax.
    #[serde(default)]
    pub county: Option<String>,
    /// Self-employment income outside these records; waives the $400 SE floor.
    #[serde(default)]
    pub has_other_se_income: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatus {
    Single,
    MarriedJoint,
    MarriedSeparate,
    Head,
}

impl FilingStatus {
    pub fn display(&self) -> &'static str {
        match self {
            FilingStatus::Single => "Single",
            FilingStatus::MarriedJoint => "Married Filing Jointly",
            FilingStatus::MarriedSeparate => "Married Filing Separately",
            FilingStatus::Head => "Head of Household",
        }
    }
}

/// Fixed expense taxonomy the free-form category strings bucket into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum ExpenseCategory {
    Fuel,
    VehicleMaintenance,
    Supplies,
    Equipment,
    Meals,
    Travel,
    Insurance,
    PhoneInternet,
    HomeOffice,
    Software,
    Professional,
    Advertising,
    Other,
}

impl ExpenseCategory {
    /// Bucket a raw category string. Matching is case-insensitive and keyed
    /// on the vocabulary gig platforms and bookkeeping apps actually emit.
    pub fn from_raw(raw: &str) -> Self {
        let s = raw.trim().to_lowercase();
        match s.as_str() {
            "fuel" | "gas" | "gasoline" | "diesel" => ExpenseCategory::Fuel,
            "maintenance" | "repairs" | "vehicle maintenance" | "car repair" | "oil change" => {
                ExpenseCategory::VehicleMaintenance
            }
            "supplies" | "materials" | "parts" => ExpenseCategory::Supplies,
            "equipment" | "tools" | "gear" => ExpenseCategory::Equipment,
            "meals" | "food" | "meal" => ExpenseCategory::Meals,
            "travel" | "lodging" | "hotel" | "airfare" | "parking" | "tolls" => {
                ExpenseCategory::Travel
            }
            "insurance" => ExpenseCategory::Insurance,
            "phone" | "internet" | "phone/internet" | "cell phone" => {
                ExpenseCategory::PhoneInternet
            }
            "home office" | "rent" | "office" => ExpenseCategory::HomeOffice,
            "software" | "subscriptions" | "apps" => ExpenseCategory::Software,
            "professional" | "legal" | "accounting" | "licenses" | "fees" => {
                ExpenseCategory::Professional
            }
            "advertising" | "marketing" => ExpenseCategory::Advertising,
            _ => ExpenseCategory::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExpenseCategory::Fuel => "Fuel",
            ExpenseCategory::VehicleMaintenance => "Vehicle Maintenance",
            ExpenseCategory::Supplies => "Supplies",
            ExpenseCategory::Equipment => "Equipment",
            ExpenseCategory::Meals => "Meals",
            ExpenseCategory::Travel => "Travel",
            ExpenseCategory::Insurance => "Insurance",
            ExpenseCategory::PhoneInternet => "Phone & Internet",
            ExpenseCategory::HomeOffice => "Home Office",
            ExpenseCategory::Software => "Software",
            ExpenseCategory::Professional => "Professional Services",
            ExpenseCategory::Advertising => "Advertising",
            ExpenseCategory::Other => "Other",
        }
    }
}

/// Accepts "YYYY-MM-DD"; anything unparseable becomes `None` so a single
/// malformed record cannot abort the batch.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()))
}

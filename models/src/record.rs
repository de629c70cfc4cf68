// models/src/record.rs

use serde::{Deserialize, Serialize};

use crate::errors::{FieldError, ValidationError, ValidationResult};
use crate::schema;

/// Patient gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const VALUES: &'static [&'static str] = &["Male", "Female", "Other"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Male" => Some(Gender::Male),
            "Female" => Some(Gender::Female),
            "Other" => Some(Gender::Other),
            _ => None,
        }
    }
}

/// Isolated organism species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Species {
    #[serde(rename = "E. coli")]
    EColi,
    #[serde(rename = "Klebsiella spp.")]
    Klebsiella,
    #[serde(rename = "Pseudomonas spp.")]
    Pseudomonas,
    Other,
}

impl Species {
    pub const VALUES: &'static [&'static str] =
        &["E. coli", "Klebsiella spp.", "Pseudomonas spp.", "Other"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Species::EColi => "E. coli",
            Species::Klebsiella => "Klebsiella spp.",
            Species::Pseudomonas => "Pseudomonas spp.",
            Species::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "E. coli" => Some(Species::EColi),
            "Klebsiella spp." => Some(Species::Klebsiella),
            "Pseudomonas spp." => Some(Species::Pseudomonas),
            "Other" => Some(Species::Other),
            _ => None,
        }
    }
}

/// Ward the patient was treated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClinicalSetting {
    #[serde(rename = "ICU")]
    Icu,
    #[serde(rename = "Internal Medicine")]
    InternalMedicine,
    Surgery,
    Other,
}

impl ClinicalSetting {
    pub const VALUES: &'static [&'static str] =
        &["ICU", "Internal Medicine", "Surgery", "Other"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClinicalSetting::Icu => "ICU",
            ClinicalSetting::InternalMedicine => "Internal Medicine",
            ClinicalSetting::Surgery => "Surgery",
            ClinicalSetting::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ICU" => Some(ClinicalSetting::Icu),
            "Internal Medicine" => Some(ClinicalSetting::InternalMedicine),
            "Surgery" => Some(ClinicalSetting::Surgery),
            "Other" => Some(ClinicalSetting::Other),
            _ => None,
        }
    }
}

/// How the infection was acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Acquisition {
    Community,
    Hospital,
    #[serde(rename = "Healthcare-associated")]
    HealthcareAssociated,
}

impl Acquisition {
    pub const VALUES: &'static [&'static str] =
        &["Community", "Hospital", "Healthcare-associated"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Acquisition::Community => "Community",
            Acquisition::Hospital => "Hospital",
            Acquisition::HealthcareAssociated => "Healthcare-associated",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Community" => Some(Acquisition::Community),
            "Hospital" => Some(Acquisition::Hospital),
            "Healthcare-associated" => Some(Acquisition::HealthcareAssociated),
            _ => None,
        }
    }
}

/// Source of the bloodstream infection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BsiSource {
    Primary,
    Lung,
    Abdomen,
    #[serde(rename = "UTI")]
    Uti,
    Other,
}

impl BsiSource {
    pub const VALUES: &'static [&'static str] =
        &["Primary", "Lung", "Abdomen", "UTI", "Other"];

    pub fn as_str(&self) -> &'static str {
        match self {
            BsiSource::Primary => "Primary",
            BsiSource::Lung => "Lung",
            BsiSource::Abdomen => "Abdomen",
            BsiSource::Uti => "UTI",
            BsiSource::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Primary" => Some(BsiSource::Primary),
            "Lung" => Some(BsiSource::Lung),
            "Abdomen" => Some(BsiSource::Abdomen),
            "UTI" => Some(BsiSource::Uti),
            "Other" => Some(BsiSource::Other),
            _ => None,
        }
    }
}

/// One validated clinical observation, one sheet row. Immutable once
/// appended: there is no update or delete path, and no identifier beyond
/// the row position in the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub age: u32,
    pub gender: Gender,
    pub species: Species,
    pub rectal_cpe_positive: bool,
    pub clinical_setting: ClinicalSetting,
    pub acquisition: Acquisition,
    pub bsi_source: BsiSource,
    pub chf: bool,
    pub ckd: bool,
    pub tumor: bool,
    pub diabetes: bool,
    pub immunosuppressed: bool,
    pub carbapenem_resistant: bool,
    pub blbli_resistant: bool,
    pub fluoroquinolone_resistant: bool,
    pub third_gen_ceph_resistant: bool,
}

/// A yes/no answer as submitted over the wire. The entry form posts JSON
/// booleans, but `0`/`1` and `Yes`/`No` text are accepted as well since
/// that is how the sheet and the upstream form encode these fields.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawBool {
    Flag(bool),
    Num(i64),
    Text(String),
}

impl RawBool {
    fn coerce(&self) -> Option<bool> {
        match self {
            RawBool::Flag(b) => Some(*b),
            RawBool::Num(0) => Some(false),
            RawBool::Num(1) => Some(true),
            RawBool::Num(_) => None,
            RawBool::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "yes" | "true" | "1" => Some(true),
                "no" | "false" | "0" => Some(false),
                _ => None,
            },
        }
    }
}

/// An intake submission before validation. Every field is optional so a
/// partially filled form can be reported back with the full list of
/// offending fields rather than failing on the first one.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRecord {
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub species: Option<String>,
    pub rectal_cpe_positive: Option<RawBool>,
    pub clinical_setting: Option<String>,
    pub acquisition: Option<String>,
    pub bsi_source: Option<String>,
    pub chf: Option<RawBool>,
    pub ckd: Option<RawBool>,
    pub tumor: Option<RawBool>,
    pub diabetes: Option<RawBool>,
    pub immunosuppressed: Option<RawBool>,
    pub carbapenem_resistant: Option<RawBool>,
    pub blbli_resistant: Option<RawBool>,
    pub fluoroquinolone_resistant: Option<RawBool>,
    pub third_gen_ceph_resistant: Option<RawBool>,
}

fn check_enum<T: Copy>(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    raw: &Option<String>,
    parse: fn(&str) -> Option<T>,
    allowed: &'static [&'static str],
) -> Option<T> {
    match raw {
        None => {
            errors.push(FieldError::new(field, "missing"));
            None
        }
        Some(s) => match parse(s) {
            Some(v) => Some(v),
            None => {
                errors.push(FieldError::new(
                    field,
                    format!("'{}' is not one of {}", s, allowed.join(", ")),
                ));
                None
            }
        },
    }
}

fn check_bool(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    raw: &Option<RawBool>,
) -> Option<bool> {
    match raw {
        None => {
            errors.push(FieldError::new(field, "missing"));
            None
        }
        Some(b) => match b.coerce() {
            Some(v) => Some(v),
            None => {
                errors.push(FieldError::new(field, "not a yes/no value"));
                None
            }
        },
    }
}

/// Parses one sheet cell holding a boolean. Rows are written as `1`/`0`
/// but the sheet service may hand back `TRUE`/`FALSE` for formatted cells.
fn parse_bool_cell(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

impl Record {
    /// Validates a raw submission into a `Record`.
    ///
    /// Checks presence and domain membership for every schema field and
    /// collects every offending field into the returned `ValidationError`.
    pub fn validate(raw: &RawRecord) -> ValidationResult<Record> {
        let mut errors = Vec::new();

        let age = match raw.age {
            None => {
                errors.push(FieldError::new("age", "missing"));
                None
            }
            Some(a) if a < 0 => {
                errors.push(FieldError::new("age", format!("{} is negative", a)));
                None
            }
            Some(a) => match u32::try_from(a) {
                Ok(a) => Some(a),
                Err(_) => {
                    errors.push(FieldError::new("age", format!("{} is out of range", a)));
                    None
                }
            },
        };
        let gender = check_enum(&mut errors, "gender", &raw.gender, Gender::parse, Gender::VALUES);
        let species =
            check_enum(&mut errors, "species", &raw.species, Species::parse, Species::VALUES);
        let rectal_cpe_positive =
            check_bool(&mut errors, "rectal_cpe_positive", &raw.rectal_cpe_positive);
        let clinical_setting = check_enum(
            &mut errors,
            "clinical_setting",
            &raw.clinical_setting,
            ClinicalSetting::parse,
            ClinicalSetting::VALUES,
        );
        let acquisition = check_enum(
            &mut errors,
            "acquisition",
            &raw.acquisition,
            Acquisition::parse,
            Acquisition::VALUES,
        );
        let bsi_source = check_enum(
            &mut errors,
            "bsi_source",
            &raw.bsi_source,
            BsiSource::parse,
            BsiSource::VALUES,
        );
        let chf = check_bool(&mut errors, "chf", &raw.chf);
        let ckd = check_bool(&mut errors, "ckd", &raw.ckd);
        let tumor = check_bool(&mut errors, "tumor", &raw.tumor);
        let diabetes = check_bool(&mut errors, "diabetes", &raw.diabetes);
        let immunosuppressed = check_bool(&mut errors, "immunosuppressed", &raw.immunosuppressed);
        let carbapenem_resistant =
            check_bool(&mut errors, "carbapenem_resistant", &raw.carbapenem_resistant);
        let blbli_resistant = check_bool(&mut errors, "blbli_resistant", &raw.blbli_resistant);
        let fluoroquinolone_resistant = check_bool(
            &mut errors,
            "fluoroquinolone_resistant",
            &raw.fluoroquinolone_resistant,
        );
        let third_gen_ceph_resistant = check_bool(
            &mut errors,
            "third_gen_ceph_resistant",
            &raw.third_gen_ceph_resistant,
        );

        if !errors.is_empty() {
            return Err(ValidationError::new(errors));
        }

        // Every Option is Some once the error list is empty.
        Ok(Record {
            age: age.unwrap(),
            gender: gender.unwrap(),
            species: species.unwrap(),
            rectal_cpe_positive: rectal_cpe_positive.unwrap(),
            clinical_setting: clinical_setting.unwrap(),
            acquisition: acquisition.unwrap(),
            bsi_source: bsi_source.unwrap(),
            chf: chf.unwrap(),
            ckd: ckd.unwrap(),
            tumor: tumor.unwrap(),
            diabetes: diabetes.unwrap(),
            immunosuppressed: immunosuppressed.unwrap(),
            carbapenem_resistant: carbapenem_resistant.unwrap(),
            blbli_resistant: blbli_resistant.unwrap(),
            fluoroquinolone_resistant: fluoroquinolone_resistant.unwrap(),
            third_gen_ceph_resistant: third_gen_ceph_resistant.unwrap(),
        })
    }

    /// Serializes the record as one sheet row, cells in schema order.
    /// Booleans are written as `1`/`0`, matching the existing dataset.
    pub fn to_row(&self) -> Vec<String> {
        fn b(v: bool) -> String {
            if v { "1".to_string() } else { "0".to_string() }
        }
        vec![
            self.age.to_string(),
            self.gender.as_str().to_string(),
            self.species.as_str().to_string(),
            b(self.rectal_cpe_positive),
            self.clinical_setting.as_str().to_string(),
            self.acquisition.as_str().to_string(),
            self.bsi_source.as_str().to_string(),
            b(self.chf),
            b(self.ckd),
            b(self.tumor),
            b(self.diabetes),
            b(self.immunosuppressed),
            b(self.carbapenem_resistant),
            b(self.blbli_resistant),
            b(self.fluoroquinolone_resistant),
            b(self.third_gen_ceph_resistant),
        ]
    }

    /// Parses one sheet row back into a `Record` using the same schema
    /// ordering. Callers pad short rows to schema width first; the sheet
    /// service trims trailing empty cells.
    pub fn from_row(cells: &[String]) -> ValidationResult<Record> {
        let mut errors = Vec::new();
        if cells.len() != schema::width() {
            errors.push(FieldError::new(
                "row",
                format!("expected {} cells, got {}", schema::width(), cells.len()),
            ));
            return Err(ValidationError::new(errors));
        }

        let age = match cells[0].trim().parse::<u32>() {
            Ok(a) => Some(a),
            Err(_) => {
                errors.push(FieldError::new(
                    "age",
                    format!("'{}' is not a non-negative integer", cells[0]),
                ));
                None
            }
        };

        fn cell_enum<T: Copy>(
            errors: &mut Vec<FieldError>,
            field: &'static str,
            cell: &str,
            parse: fn(&str) -> Option<T>,
        ) -> Option<T> {
            match parse(cell.trim()) {
                Some(v) => Some(v),
                None => {
                    errors.push(FieldError::new(
                        field,
                        format!("'{}' is out of domain", cell),
                    ));
                    None
                }
            }
        }
        fn cell_bool(
            errors: &mut Vec<FieldError>,
            field: &'static str,
            cell: &str,
        ) -> Option<bool> {
            match parse_bool_cell(cell) {
                Some(v) => Some(v),
                None => {
                    errors.push(FieldError::new(
                        field,
                        format!("'{}' is not a 0/1 value", cell),
                    ));
                    None
                }
            }
        }

        let gender = cell_enum(&mut errors, "gender", &cells[1], Gender::parse);
        let species = cell_enum(&mut errors, "species", &cells[2], Species::parse);
        let rectal_cpe_positive = cell_bool(&mut errors, "rectal_cpe_positive", &cells[3]);
        let clinical_setting =
            cell_enum(&mut errors, "clinical_setting", &cells[4], ClinicalSetting::parse);
        let acquisition = cell_enum(&mut errors, "acquisition", &cells[5], Acquisition::parse);
        let bsi_source = cell_enum(&mut errors, "bsi_source", &cells[6], BsiSource::parse);
        let chf = cell_bool(&mut errors, "chf", &cells[7]);
        let ckd = cell_bool(&mut errors, "ckd", &cells[8]);
        let tumor = cell_bool(&mut errors, "tumor", &cells[9]);
        let diabetes = cell_bool(&mut errors, "diabetes", &cells[10]);
        let immunosuppressed = cell_bool(&mut errors, "immunosuppressed", &cells[11]);
        let carbapenem_resistant = cell_bool(&mut errors, "carbapenem_resistant", &cells[12]);
        let blbli_resistant = cell_bool(&mut errors, "blbli_resistant", &cells[13]);
        let fluoroquinolone_resistant =
            cell_bool(&mut errors, "fluoroquinolone_resistant", &cells[14]);
        let third_gen_ceph_resistant =
            cell_bool(&mut errors, "third_gen_ceph_resistant", &cells[15]);

        if !errors.is_empty() {
            return Err(ValidationError::new(errors));
        }

        Ok(Record {
            age: age.unwrap(),
            gender: gender.unwrap(),
            species: species.unwrap(),
            rectal_cpe_positive: rectal_cpe_positive.unwrap(),
            clinical_setting: clinical_setting.unwrap(),
            acquisition: acquisition.unwrap(),
            bsi_source: bsi_source.unwrap(),
            chf: chf.unwrap(),
            ckd: ckd.unwrap(),
            tumor: tumor.unwrap(),
            diabetes: diabetes.unwrap(),
            immunosuppressed: immunosuppressed.unwrap(),
            carbapenem_resistant: carbapenem_resistant.unwrap(),
            blbli_resistant: blbli_resistant.unwrap(),
            fluoroquinolone_resistant: fluoroquinolone_resistant.unwrap(),
            third_gen_ceph_resistant: third_gen_ceph_resistant.unwrap(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_raw() -> RawRecord {
        RawRecord {
            age: Some(45),
            gender: Some("Male".to_string()),
            species: Some("E. coli".to_string()),
            rectal_cpe_positive: Some(RawBool::Flag(false)),
            clinical_setting: Some("ICU".to_string()),
            acquisition: Some("Hospital".to_string()),
            bsi_source: Some("UTI".to_string()),
            chf: Some(RawBool::Flag(false)),
            ckd: Some(RawBool::Flag(true)),
            tumor: Some(RawBool::Flag(false)),
            diabetes: Some(RawBool::Flag(true)),
            immunosuppressed: Some(RawBool::Flag(false)),
            carbapenem_resistant: Some(RawBool::Flag(false)),
            blbli_resistant: Some(RawBool::Flag(true)),
            fluoroquinolone_resistant: Some(RawBool::Flag(false)),
            third_gen_ceph_resistant: Some(RawBool::Flag(true)),
        }
    }

    #[test]
    fn should_validate_a_complete_submission() {
        let record = Record::validate(&full_raw()).unwrap();
        assert_eq!(record.age, 45);
        assert_eq!(record.gender, Gender::Male);
        assert_eq!(record.species, Species::EColi);
        assert!(!record.rectal_cpe_positive);
        assert_eq!(record.clinical_setting, ClinicalSetting::Icu);
        assert_eq!(record.acquisition, Acquisition::Hospital);
        assert_eq!(record.bsi_source, BsiSource::Uti);
        assert!(record.ckd && record.diabetes);
        assert!(record.blbli_resistant && record.third_gen_ceph_resistant);
        assert!(!record.chf && !record.tumor && !record.immunosuppressed);
        assert!(!record.carbapenem_resistant && !record.fluoroquinolone_resistant);
    }

    #[test]
    fn should_reject_negative_age() {
        let mut raw = full_raw();
        raw.age = Some(-1);
        let err = Record::validate(&raw).unwrap_err();
        assert_eq!(err.field_names(), vec!["age"]);
    }

    #[test]
    fn should_reject_age_exceeding_the_stored_width() {
        let mut raw = full_raw();
        raw.age = Some(u32::MAX as i64 + 46);
        let err = Record::validate(&raw).unwrap_err();
        assert_eq!(err.field_names(), vec!["age"]);
    }

    #[test]
    fn should_accept_age_at_the_stored_maximum() {
        let mut raw = full_raw();
        raw.age = Some(u32::MAX as i64);
        let record = Record::validate(&raw).unwrap();
        assert_eq!(record.age, u32::MAX);
    }

    #[test]
    fn should_reject_unknown_gender() {
        let mut raw = full_raw();
        raw.gender = Some("Unknown".to_string());
        let err = Record::validate(&raw).unwrap_err();
        assert_eq!(err.field_names(), vec!["gender"]);
    }

    #[test]
    fn should_report_every_offending_field() {
        let mut raw = full_raw();
        raw.age = Some(-3);
        raw.species = Some("Serratia".to_string());
        raw.chf = None;
        raw.bsi_source = None;
        let err = Record::validate(&raw).unwrap_err();
        assert_eq!(err.field_names(), vec!["age", "species", "bsi_source", "chf"]);
    }

    #[test]
    fn should_report_all_fields_on_empty_submission() {
        let err = Record::validate(&RawRecord::default()).unwrap_err();
        assert_eq!(err.fields.len(), crate::schema::width());
    }

    #[test]
    fn should_coerce_yes_no_and_numeric_booleans() {
        let mut raw = full_raw();
        raw.chf = Some(RawBool::Text("Yes".to_string()));
        raw.ckd = Some(RawBool::Num(0));
        raw.tumor = Some(RawBool::Text("no".to_string()));
        let record = Record::validate(&raw).unwrap();
        assert!(record.chf);
        assert!(!record.ckd);
        assert!(!record.tumor);
    }

    #[test]
    fn should_reject_out_of_range_numeric_boolean() {
        let mut raw = full_raw();
        raw.diabetes = Some(RawBool::Num(2));
        let err = Record::validate(&raw).unwrap_err();
        assert_eq!(err.field_names(), vec!["diabetes"]);
    }

    #[test]
    fn row_round_trips_through_schema_order() {
        let record = Record::validate(&full_raw()).unwrap();
        let row = record.to_row();
        assert_eq!(row.len(), crate::schema::width());
        assert_eq!(row[0], "45");
        assert_eq!(row[1], "Male");
        assert_eq!(row[2], "E. coli");
        assert_eq!(row[3], "0");
        assert_eq!(row[6], "UTI");
        let parsed = Record::from_row(&row).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn from_row_accepts_sheet_style_booleans() {
        let record = Record::validate(&full_raw()).unwrap();
        let mut row = record.to_row();
        row[3] = "FALSE".to_string();
        row[8] = "TRUE".to_string();
        let parsed = Record::from_row(&row).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn from_row_rejects_short_rows() {
        let row = vec!["45".to_string(), "Male".to_string()];
        assert!(Record::from_row(&row).is_err());
    }

    #[test]
    fn from_row_reports_every_bad_cell() {
        let record = Record::validate(&full_raw()).unwrap();
        let mut row = record.to_row();
        row[1] = "X".to_string();
        row[7] = "maybe".to_string();
        let err = Record::from_row(&row).unwrap_err();
        assert_eq!(err.field_names(), vec!["gender", "chf"]);
    }

    #[test]
    fn raw_record_deserializes_mixed_boolean_encodings() {
        let raw: RawRecord = serde_json::from_str(
            r#"{
                "age": 45, "gender": "Male", "species": "E. coli",
                "rectal_cpe_positive": false, "clinical_setting": "ICU",
                "acquisition": "Hospital", "bsi_source": "UTI",
                "chf": 0, "ckd": "Yes", "tumor": false, "diabetes": true,
                "immunosuppressed": "no", "carbapenem_resistant": 0,
                "blbli_resistant": 1, "fluoroquinolone_resistant": false,
                "third_gen_ceph_resistant": "1"
            }"#,
        )
        .unwrap();
        let record = Record::validate(&raw).unwrap();
        assert!(record.ckd && record.blbli_resistant && record.third_gen_ceph_resistant);
        assert!(!record.chf && !record.immunosuppressed);
    }

    #[test]
    fn validation_error_display_lists_offending_fields() {
        let mut raw = full_raw();
        raw.age = None;
        raw.gender = None;
        let err = Record::validate(&raw).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("age"));
        assert!(msg.contains("gender"));
    }
}

// models/src/schema.rs
//
// The fixed, ordered field definition shared by validation, column mapping,
// preview, and CSV export. Pure data: changing this list (together with the
// matching `Record` field) is the only supported way to add or remove a
// collected field.

use crate::record::{Acquisition, BsiSource, ClinicalSetting, Gender, Species};

/// The type of a single schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Non-negative integer age in years.
    Age,
    /// Closed set of allowed string values.
    Enum(&'static [&'static str]),
    /// Yes/no field, stored as `1`/`0` in the sheet.
    Bool,
}

/// One entry of the intake schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Column name, also the CSV header cell.
    pub name: &'static str,
    /// Human-readable label for the entry form.
    pub label: &'static str,
    pub kind: FieldKind,
}

/// The ordered intake schema. Cell N of every sheet row corresponds to
/// entry N here; the first sheet row is the header naming each field.
pub const SCHEMA: &[FieldSpec] = &[
    FieldSpec {
        name: "age",
        label: "Age",
        kind: FieldKind::Age,
    },
    FieldSpec {
        name: "gender",
        label: "Gender",
        kind: FieldKind::Enum(Gender::VALUES),
    },
    FieldSpec {
        name: "species",
        label: "Species",
        kind: FieldKind::Enum(Species::VALUES),
    },
    FieldSpec {
        name: "rectal_cpe_positive",
        label: "Rectal CPE Positive",
        kind: FieldKind::Bool,
    },
    FieldSpec {
        name: "clinical_setting",
        label: "Clinical Setting",
        kind: FieldKind::Enum(ClinicalSetting::VALUES),
    },
    FieldSpec {
        name: "acquisition",
        label: "Acquisition",
        kind: FieldKind::Enum(Acquisition::VALUES),
    },
    FieldSpec {
        name: "bsi_source",
        label: "BSI Source",
        kind: FieldKind::Enum(BsiSource::VALUES),
    },
    FieldSpec {
        name: "chf",
        label: "CHF",
        kind: FieldKind::Bool,
    },
    FieldSpec {
        name: "ckd",
        label: "CKD",
        kind: FieldKind::Bool,
    },
    FieldSpec {
        name: "tumor",
        label: "Tumor",
        kind: FieldKind::Bool,
    },
    FieldSpec {
        name: "diabetes",
        label: "Diabetes",
        kind: FieldKind::Bool,
    },
    FieldSpec {
        name: "immunosuppressed",
        label: "Immunosuppressed",
        kind: FieldKind::Bool,
    },
    FieldSpec {
        name: "carbapenem_resistant",
        label: "Carbapenem Resistant",
        kind: FieldKind::Bool,
    },
    FieldSpec {
        name: "blbli_resistant",
        label: "BLBLI Resistant",
        kind: FieldKind::Bool,
    },
    FieldSpec {
        name: "fluoroquinolone_resistant",
        label: "Fluoroquinolone Resistant",
        kind: FieldKind::Bool,
    },
    FieldSpec {
        name: "third_gen_ceph_resistant",
        label: "3rd Gen Cephalosporin Resistant",
        kind: FieldKind::Bool,
    },
];

/// Ordered column names, used as the sheet header and the CSV header.
pub fn field_names() -> Vec<&'static str> {
    SCHEMA.iter().map(|f| f.name).collect()
}

/// Number of cells in one sheet row.
pub fn width() -> usize {
    SCHEMA.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_has_sixteen_fields() {
        assert_eq!(SCHEMA.len(), 16);
        assert_eq!(width(), 16);
    }

    #[test]
    fn schema_order_matches_sheet_columns() {
        let names = field_names();
        assert_eq!(names[0], "age");
        assert_eq!(names[1], "gender");
        assert_eq!(names[2], "species");
        assert_eq!(names[3], "rectal_cpe_positive");
        assert_eq!(names[4], "clinical_setting");
        assert_eq!(names[5], "acquisition");
        assert_eq!(names[6], "bsi_source");
        assert_eq!(names[15], "third_gen_ceph_resistant");
    }

    #[test]
    fn enum_fields_expose_their_closed_value_sets() {
        let gender = SCHEMA.iter().find(|f| f.name == "gender").unwrap();
        match gender.kind {
            FieldKind::Enum(values) => assert_eq!(values, &["Male", "Female", "Other"]),
            _ => panic!("gender must be an enum field"),
        }
    }
}

//! Code tables used by the SSG API. Keyed by the short code the API expects;
//! labels exist for display only.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::errors::InvalidFieldError;

macro_rules! code_table {
    (
        $(#[$meta:meta])*
        $name:ident, $what:literal {
            $($variant:ident => ($code:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Read-only `(code, label)` table in API order.
            pub const MAPPINGS: &'static [(&'static str, &'static str)] = &[$(($code, $label)),+];

            pub fn code(self) -> &'static str {
                match self {
                    $(Self::$variant => $code),+
                }
            }

            pub fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl FromStr for $name {
            type Err = InvalidFieldError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($code => Ok(Self::$variant),)+
                    other => Err(InvalidFieldError::new(
                        $what,
                        concat!("one of the ", $what, " codes"),
                        format!("unknown code '{other}'"),
                    )),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.code())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.code())
            }
        }
    };
}

code_table! {
    /// Attendance status of a trainee for a session.
    AttendanceStatus, "attendance status" {
        Confirmed => ("1", "Confirmed"),
        Unconfirmed => ("2", "Unconfirmed"),
        Rejected => ("3", "Rejected"),
        TpVoided => ("4", "TP Voided"),
    }
}

code_table! {
    /// Identity document type used by the attendance API.
    TraineeIdType, "trainee ID type" {
        SingaporeBlue => ("SB", "Singapore Blue"),
        SingaporePink => ("SP", "Singapore Pink"),
        FinWorkPermit => ("SO", "Fin/Work Permit"),
        ForeignPassport => ("FP", "Foreign Passport"),
        Others => ("OT", "Others"),
    }
}

code_table! {
    SurveyLanguage, "survey language" {
        English => ("EL", "English"),
        Mandarin => ("MN", "Mandarin"),
        Malay => ("MY", "Malay"),
        Tamil => ("TM", "Tamil"),
    }
}

code_table! {
    /// Identity document type used by the assessments API.
    AssessmentIdType, "assessment ID type" {
        Nric => ("NRIC", "NRIC"),
        Fin => ("FIN", "FIN"),
        Others => ("OTHERS", "Others"),
    }
}

code_table! {
    Grade, "grade" {
        A => ("A", "A"),
        B => ("B", "B"),
        C => ("C", "C"),
        D => ("D", "D"),
        E => ("E", "E"),
        F => ("F", "F"),
    }
}

code_table! {
    AssessmentResult, "result" {
        Pass => ("Pass", "Pass"),
        Fail => ("Fail", "Fail"),
        Exempt => ("Exempt", "Exempt"),
    }
}

code_table! {
    AssessmentAction, "action" {
        Update => ("update", "Update"),
        Void => ("void", "Void"),
    }
}

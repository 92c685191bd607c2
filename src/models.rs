use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDateTime, TimeZone, Utc};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

use crate::error::AppError;

/// Resident recorded for an apartment nobody lives in.
pub const VACANT: &str = "Vacant";

/// Fixed-vocabulary text columns: parsed from and stored as their display label.
macro_rules! text_enum {
    ($name:ident, $what:literal, { $($variant:ident => $label:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .find(|v| v.as_str() == s.trim())
                    .copied()
                    .ok_or_else(|| {
                        let choices: Vec<&str> = $name::ALL.iter().map(|v| v.as_str()).collect();
                        AppError::Validation(format!(
                            "unknown {} '{}' (expected one of: {})",
                            $what,
                            s,
                            choices.join(", ")
                        ))
                    })
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                let s = value.as_str()?;
                s.parse()
                    .map_err(|e: AppError| FromSqlError::Other(e.to_string().into()))
            }
        }
    };
}

text_enum!(Month, "month", {
    January => "January",
    February => "February",
    March => "March",
    April => "April",
    May => "May",
    June => "June",
    July => "July",
    August => "August",
    September => "September",
    October => "October",
    November => "November",
    December => "December",
});

text_enum!(CollectionType, "collection type", {
    Maintenance => "Maintenance",
    Other => "Other",
});

text_enum!(ExpenseType, "expense type", {
    SecurityService => "Security Service",
    CleaningServices => "Cleaning Services",
    Utilities => "Utilities",
    Repairs => "Repairs",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    /// Money paid out.
    Debit,
    /// Money received.
    Credit,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debit => "Debit",
            Self::Credit => "Credit",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Debit" | "Debit (Money Paid)" => Ok(Self::Debit),
            "Credit" | "Credit (Money Received)" => Ok(Self::Credit),
            other => Err(AppError::Validation(format!(
                "transaction type must be Debit or Credit, got '{other}'"
            ))),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        s.parse()
            .map_err(|e: AppError| FromSqlError::Other(e.to_string().into()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Apartment {
    pub id: String,
    pub owner: String,
    pub resident: String,
    pub same_flag: bool,
}

impl Apartment {
    /// Build an apartment from raw form/file input. Blank resident becomes
    /// [`VACANT`]; the same-flag is derived, never supplied.
    pub fn new(id: &str, owner: &str, resident: &str) -> Self {
        let mut apt = Self {
            id: id.trim().to_string(),
            owner: owner.trim().to_string(),
            resident: resident.trim().to_string(),
            same_flag: false,
        };
        apt.normalize();
        apt
    }

    pub fn normalize(&mut self) {
        if self.resident.is_empty() {
            self.resident = VACANT.to_string();
        }
        self.same_flag = !self.owner.is_empty() && self.owner == self.resident;
    }
}

#[derive(Debug, Clone)]
pub struct Collection {
    pub id: i64,
    pub apartment_id: String,
    pub month: Month,
    pub collection_type: CollectionType,
    pub price: f64,
    pub date: String,
}

impl Collection {
    /// Local calendar date of the collection as `YYYY-MM-DD`.
    pub fn receipt_date(&self) -> String {
        self.date_in(&Local)
    }

    /// `date` is stored by SQLite as UTC; render its calendar day in `tz`.
    pub fn date_in<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: fmt::Display,
    {
        NaiveDateTime::parse_from_str(&self.date, "%Y-%m-%d %H:%M:%S")
            .map(|utc| {
                Utc.from_utc_datetime(&utc)
                    .with_timezone(tz)
                    .format("%Y-%m-%d")
                    .to_string()
            })
            .unwrap_or_else(|_| self.date.chars().take(10).collect())
    }
}

#[derive(Debug, Clone)]
pub struct Payment {
    pub id: i64,
    pub month: Month,
    pub expense_type: ExpenseType,
    pub price: f64,
    pub transaction_type: TransactionType,
    pub date: String,
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
}

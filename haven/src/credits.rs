//! Guest credit ledger collaborator.
//!
//! The booking core only ever asks the ledger to turn a reservation's
//! pending credit into earned credit when the guest checks out. How credit
//! is granted and spent belongs to the ledger.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use log::debug;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::database::{Database, DatabaseConfig};
use crate::error::{Error, Result};
use crate::money::{self, check_amount};
use crate::reservation::{ReservationId, ValidationError};

/// Credit ledger consulted on checkout.
pub trait CreditLedger {
    /// Marks every pending credit entry tied to `reservation` as earned.
    /// Returns how many entries changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be updated. The caller logs it;
    /// the checkout is not undone.
    fn earn_pending_credits(&self, reservation: ReservationId) -> Result<usize>;
}

/// A ledger that holds no credit.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCreditLedger;

impl CreditLedger for NoopCreditLedger {
    fn earn_pending_credits(&self, _reservation: ReservationId) -> Result<usize> {
        Ok(0)
    }
}

/// State of a credit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditStatus {
    /// Granted but not yet usable.
    Pending,
    /// Usable by the guest.
    Earned,
}

impl CreditStatus {
    /// Stored name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Earned => "earned",
        }
    }
}

impl fmt::Display for CreditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CreditStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "earned" => Ok(Self::Earned),
            _ => Err(ValidationError {
                field: "credit_status".into(),
                message: format!("unknown credit status '{s}'"),
            }),
        }
    }
}

/// One ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreditEntry {
    /// Storage identifier.
    pub id: i64,
    /// Reservation the credit is tied to.
    pub reservation: ReservationId,
    /// Amount of credit.
    pub amount: Decimal,
    /// Current state.
    pub status: CreditStatus,
    /// When the entry was recorded.
    pub created_at: DateTime<Utc>,
    /// When the entry became earned.
    pub earned_at: Option<DateTime<Utc>>,
}

/// Credit ledger kept in the `credit_entries` table of the haven database.
///
/// It uses its own connection, so it only runs after the booking
/// transaction has committed and never extends it.
#[derive(Debug)]
pub struct SqliteCreditLedger {
    conn: Connection,
}

impl SqliteCreditLedger {
    /// Opens the ledger on the database described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open(config: DatabaseConfig) -> Result<Self> {
        let db = Database::open(config)?;
        Ok(Self {
            conn: db.into_connection(),
        })
    }

    /// Records pending credit for a reservation.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is negative or finer than a cent, or
    /// the insert fails.
    pub fn add_pending(&self, reservation: ReservationId, amount: Decimal) -> Result<CreditEntry> {
        check_amount("amount", amount)?;
        let amount = money::round(amount);
        let created_at = Utc::now();
        self.conn.execute(
            "INSERT INTO credit_entries (reservation_id, amount, status, created_at) VALUES (?, ?, ?, ?)",
            params![
                reservation.to_string(),
                amount.to_string(),
                CreditStatus::Pending.as_str(),
                created_at.to_rfc3339(),
            ],
        )?;
        Ok(CreditEntry {
            id: self.conn.last_insert_rowid(),
            reservation,
            amount,
            status: CreditStatus::Pending,
            created_at,
            earned_at: None,
        })
    }

    /// Lists the entries of a reservation, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row is malformed.
    pub fn entries(&self, reservation: ReservationId) -> Result<Vec<CreditEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, amount, status, created_at, earned_at FROM credit_entries
             WHERE reservation_id = ? ORDER BY id",
        )?;
        let rows = stmt.query_map([reservation.to_string()], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<String>>(4)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, amount, status, created_at, earned_at) = row?;
            entries.push(CreditEntry {
                id,
                reservation,
                amount: parse_stored("amount", &amount)?,
                status: status.parse()?,
                created_at: parse_stored("created_at", &created_at)?,
                earned_at: earned_at
                    .map(|t| parse_stored("earned_at", &t))
                    .transpose()?,
            });
        }
        Ok(entries)
    }

    /// Sum of earned credit for a reservation.
    ///
    /// # Errors
    ///
    /// Returns an error if the entries cannot be read.
    pub fn earned_total(&self, reservation: ReservationId) -> Result<Decimal> {
        let total = self
            .entries(reservation)?
            .iter()
            .filter(|e| e.status == CreditStatus::Earned)
            .map(|e| e.amount)
            .sum();
        Ok(money::round(total))
    }
}

fn parse_stored<T>(field: &str, text: &str) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    text.parse().map_err(|e| Error::DatabaseCorruption {
        details: format!("credit entry {field} '{text}' is unreadable: {e}"),
    })
}

impl CreditLedger for SqliteCreditLedger {
    fn earn_pending_credits(&self, reservation: ReservationId) -> Result<usize> {
        let changed = self.conn.execute(
            "UPDATE credit_entries SET status = ?1, earned_at = ?2
             WHERE reservation_id = ?3 AND status = ?4",
            params![
                CreditStatus::Earned.as_str(),
                Utc::now().to_rfc3339(),
                reservation.to_string(),
                CreditStatus::Pending.as_str(),
            ],
        )?;
        debug!("earned {changed} pending credit entries for {reservation}");
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    fn ledger() -> (tempfile::TempDir, SqliteCreditLedger) {
        let dir = tempdir().unwrap();
        let config = DatabaseConfig::new(dir.path().join("haven.db"));
        let ledger = SqliteCreditLedger::open(config).unwrap();
        (dir, ledger)
    }

    #[test]
    fn test_earn_moves_only_pending_entries_of_reservation() {
        let (_dir, ledger) = ledger();
        let guest = ReservationId::new();
        let other = ReservationId::new();

        ledger.add_pending(guest, dec!(25)).unwrap();
        ledger.add_pending(guest, dec!(10.50)).unwrap();
        ledger.add_pending(other, dec!(99)).unwrap();

        assert_eq!(ledger.earn_pending_credits(guest).unwrap(), 2);
        assert_eq!(ledger.earned_total(guest).unwrap(), dec!(35.50));
        assert_eq!(ledger.earned_total(other).unwrap(), dec!(0));

        // Nothing left to earn
        assert_eq!(ledger.earn_pending_credits(guest).unwrap(), 0);
        assert!(ledger
            .entries(guest)
            .unwrap()
            .iter()
            .all(|e| e.status == CreditStatus::Earned && e.earned_at.is_some()));
    }

    #[test]
    fn test_rejects_negative_credit() {
        let (_dir, ledger) = ledger();
        assert!(ledger.add_pending(ReservationId::new(), dec!(-1)).is_err());
    }

    #[test]
    fn test_noop_ledger() {
        assert_eq!(
            NoopCreditLedger
                .earn_pending_credits(ReservationId::new())
                .unwrap(),
            0
        );
    }
}

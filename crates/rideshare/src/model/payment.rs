/// A card-like payment method held by the session's payment registry.
///
/// # Actor Framework
/// This struct implements the [`ActorEntity`](actor_framework::ActorEntity) trait,
/// allowing it to be managed by a [`ResourceActor`](actor_framework::ResourceActor).
/// Only validated [`PaymentDetails`] can reach the actor.
use crate::error::ValidationError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Type-safe identifier for payment methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MethodId(pub u32);

impl From<u32> for MethodId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "method_{}", self.0)
    }
}

fn is_digits(raw: &str, len: usize) -> bool {
    raw.len() == len && raw.bytes().all(|b| b.is_ascii_digit())
}

/// Exactly 16 ASCII digits. Debug and Display show only the last four.
#[derive(Clone, PartialEq, Eq)]
pub struct CardNumber(String);

impl CardNumber {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        if is_digits(raw, 16) {
            Ok(Self(raw.to_string()))
        } else {
            Err(ValidationError::InvalidCardNumber)
        }
    }

    /// The full number, for the payment processor only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn last4(&self) -> &str {
        &self.0[12..]
    }
}

impl fmt::Debug for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CardNumber(****{})", self.last4())
    }
}

impl Display for CardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "****{}", self.last4())
    }
}

/// Exactly 3 ASCII digits. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Cvv(String);

impl Cvv {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        if is_digits(raw, 3) {
            Ok(Self(raw.to_string()))
        } else {
            Err(ValidationError::InvalidCvv)
        }
    }

    /// The digits, for the payment processor only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Cvv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Cvv(***)")
    }
}

/// Card expiration month, parsed from `MM/YY` (years 2000-2099).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Expiration {
    year: i32,
    month: u32,
}

impl Expiration {
    /// Parses `MM/YY` and rejects months strictly before `today`'s month.
    pub fn parse(raw: &str, today: NaiveDate) -> Result<Self, ValidationError> {
        let (mm, yy) = raw
            .split_once('/')
            .filter(|(mm, yy)| is_digits(mm, 2) && is_digits(yy, 2))
            .ok_or(ValidationError::InvalidExpiration)?;

        let month: u32 = mm.parse().map_err(|_| ValidationError::InvalidExpiration)?;
        let yy: i32 = yy.parse().map_err(|_| ValidationError::InvalidExpiration)?;
        if !(1..=12).contains(&month) {
            return Err(ValidationError::InvalidExpiration);
        }

        let expiration = Self {
            year: 2000 + yy,
            month,
        };
        if expiration.is_before_month_of(today) {
            return Err(ValidationError::InvalidExpiration);
        }
        Ok(expiration)
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// True when the card stopped being valid before `today`'s month began.
    pub fn is_before_month_of(&self, today: NaiveDate) -> bool {
        (self.year, self.month) < (today.year(), today.month())
    }
}

impl Display for Expiration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}", self.month, self.year % 100)
    }
}

/// Validated card data.
///
/// Checks run in a fixed order (card number, CVV, expiration) and stop at the
/// first failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentDetails {
    pub card_number: CardNumber,
    pub cvv: Cvv,
    pub expiration: Expiration,
}

impl PaymentDetails {
    pub fn parse(
        card_number: &str,
        cvv: &str,
        expiration: &str,
        today: NaiveDate,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            card_number: CardNumber::parse(card_number)?,
            cvv: Cvv::parse(cvv)?,
            expiration: Expiration::parse(expiration, today)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentMethod {
    pub id: MethodId,
    pub card_number: CardNumber,
    pub cvv: Cvv,
    pub expiration: Expiration,
}

impl PaymentMethod {
    pub fn new(id: MethodId, details: PaymentDetails) -> Self {
        Self {
            id,
            card_number: details.card_number,
            cvv: details.cvv,
            expiration: details.expiration,
        }
    }
}
